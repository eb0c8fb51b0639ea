//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the parse domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::parse::{MataparserClient, ParseService};
use crate::domains::tools::build_tool_router;

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and wires the
/// parse service into the tool router.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let client = MataparserClient::new(&config.api);
        let parse_service = Arc::new(ParseService::new(config.clone(), Arc::new(client)));

        Self {
            tool_router: build_tool_router::<Self>(parse_service),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "Mataparser document parsing server. Use tool_parse to turn a local \
                 document or image ({}) into structured JSON matching a template.",
                self.config.upload.sorted_extensions().join(", ")
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_reports_tool_capability() {
        let server = McpServer::new(Config::default());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("tool_parse"));
    }

    #[test]
    fn server_exposes_identity_from_config() {
        let mut config = Config::default();
        config.server.name = "custom-name".to_string();
        let server = McpServer::new(config);
        assert_eq!(server.name(), "custom-name");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
    }
}
