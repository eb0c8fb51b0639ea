//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions or computations.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - Dynamic ToolRouter builder for the STDIO transport
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, execute(), to_tool() and create_route()
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//!
//! **No need to modify `server.rs`!** The router is built dynamically.

pub mod definitions;
pub mod router;

pub use router::build_tool_router;
