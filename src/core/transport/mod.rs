//! Transport layer for the MCP server.
//!
//! The server speaks MCP over STDIO only: stdout carries protocol frames
//! and stderr carries logs. The transport handles the connection lifecycle
//! and delegates message processing to the MCP server handler.

mod error;

pub mod stdio;

pub use error::{TransportError, TransportResult};
pub use stdio::StdioTransport;
