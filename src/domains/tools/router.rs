//! Tool Router - builds the rmcp ToolRouter.
//!
//! This module builds the ToolRouter for the STDIO transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::parse::ParseService;

use super::definitions::ParseTool;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(service: Arc<ParseService>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new().with_route(ParseTool::create_route(service))
}
