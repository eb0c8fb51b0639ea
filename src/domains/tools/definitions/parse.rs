//! Mataparser document parse tool.
//!
//! The single tool this server exposes. It hands the request to the parse
//! pipeline and embeds the outcome as structured content; validation and
//! remote failures are part of the payload, not protocol errors, so the
//! calling agent can branch on the error code.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::domains::parse::{ParseOutcome, ParseService};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the parse tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ParseToolParams {
    /// Path to the file to parse.
    #[schemars(
        description = "Path to the file to parse (absolute, or relative to the server's working directory)"
    )]
    pub file_path: String,

    /// JSON template describing the fields to extract.
    #[schemars(
        description = "JSON template describing the fields to extract, passed as a JSON string"
    )]
    pub json_template: String,
}

// ============================================================================
// Tool Implementation
// ============================================================================

/// Document parse tool implementation.
#[derive(Debug, Clone)]
pub struct ParseTool;

impl ParseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "tool_parse";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Parse a document or image into structured JSON using the Mataparser API. \
         Accepts a local file path and a JSON template describing the fields to extract. \
         Always returns an object with a boolean 'success' field; failures carry a stable \
         error code and a human-readable message.";

    /// Execute the tool logic (for STDIO transport via rmcp).
    #[instrument(skip_all, fields(file_path = %params.file_path))]
    pub async fn execute(params: &ParseToolParams, service: &ParseService) -> CallToolResult {
        let outcome = service
            .handle(&params.file_path, &params.json_template)
            .await;

        let summary = match &outcome {
            ParseOutcome::Success { metadata, .. } => format!(
                "Parsed {} ({:.2}MB)",
                metadata.filename, metadata.file_size_mb
            ),
            ParseOutcome::Failure(failure) => failure.message.clone(),
        };

        match serde_json::to_value(&outcome) {
            Ok(structured) => CallToolResult {
                content: vec![Content::text(summary)],
                structured_content: Some(structured),
                is_error: Some(false),
                meta: None,
            },
            Err(e) => {
                warn!("Failed to serialize structured content: {}", e);
                // Fallback to text-only
                CallToolResult::success(vec![Content::text(summary)])
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ParseToolParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO transport.
    pub fn create_route<S>(service: Arc<ParseService>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let service = service.clone();
            async move {
                let params: ParseToolParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &service).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
