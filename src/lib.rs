//! Mataparser MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server exposing the
//! Mataparser document parsing platform as a single tool: a client supplies
//! a local file path and a JSON template, the server validates both, uploads
//! the file, and returns the extracted fields or a coded failure.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, the main server
//!   handler, and the STDIO transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **parse**: Validation pipeline and the Mataparser API client
//!   - **tools**: MCP tools that can be executed by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use mataparser_mcp_server::core::{Config, McpServer, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     StdioTransport::run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, McpServer};
pub use domains::parse::{ParseErrorCode, ParseOutcome, ParseService};
