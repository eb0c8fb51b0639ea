//! Tool definitions module.
//!
//! Each tool is defined in its own file and knows how to build its own
//! route for the router.

pub mod parse;

pub use parse::{ParseTool, ParseToolParams};
