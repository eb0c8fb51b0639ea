//! Parse pipeline.
//!
//! `ParseService::handle` runs the ordered validation checks over the
//! request, then uploads the file and normalizes whatever came back. The
//! checks short-circuit: the first failing one produces the outcome and
//! nothing after it runs, so a bad template is reported even when the file
//! does not exist either.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::core::config::Config;

use super::client::{ApiCallError, FileUpload, ParserApi};
use super::outcome::{ParseErrorCode, ParseMetadata, ParseOutcome};

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Validates parse requests and proxies them to the Mataparser API.
///
/// Holds only read-only configuration and the API handle, so one instance
/// serves any number of concurrent invocations.
#[derive(Clone)]
pub struct ParseService {
    config: Arc<Config>,
    api: Arc<dyn ParserApi>,
}

impl ParseService {
    pub fn new(config: Arc<Config>, api: Arc<dyn ParserApi>) -> Self {
        Self { config, api }
    }

    /// Run one parse request end to end. Always resolves to an outcome;
    /// every failure mode maps to a coded failure rather than an error.
    pub async fn handle(&self, file_path: &str, json_template: &str) -> ParseOutcome {
        info!("Parse requested for path: {}", file_path);

        // 1. API key configured
        if self.config.api.key.trim().is_empty() {
            warn!("Parse rejected: no API key configured");
            return ParseOutcome::failure(ParseErrorCode::ApiKeyRequired, "API key is required");
        }

        // 2. Template present
        if json_template.is_empty() {
            warn!("Parse rejected: empty JSON template");
            return ParseOutcome::failure(
                ParseErrorCode::JsonTemplateRequired,
                "JSON template is required",
            );
        }

        // 3. Template is syntactically valid JSON
        if let Err(parse_error) = serde_json::from_str::<serde_json::Value>(json_template) {
            warn!("Parse rejected: invalid JSON template ({})", parse_error);
            return ParseOutcome::failure(
                ParseErrorCode::InvalidJsonTemplate,
                format!("Invalid JSON template: {parse_error}"),
            );
        }

        // 4. File exists, after resolving relative paths against the
        //    working directory
        let resolved = match self.resolve_path(file_path) {
            Ok(resolved) => resolved,
            Err(outcome) => return outcome,
        };
        let metadata = match tokio::fs::metadata(&resolved).await {
            Ok(metadata) => metadata,
            Err(_) => {
                warn!("Parse rejected: file not found at {}", resolved.display());
                return ParseOutcome::failure(
                    ParseErrorCode::FileNotFound,
                    format!(
                        "File not found: {}. Please ensure the file is accessible from the MCP server location.",
                        resolved.display()
                    ),
                );
            }
        };

        // 5. Extension on the allow-list, compared lowercase with the dot
        let extension = resolved
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        if !self.config.upload.extension_allowed(&extension) {
            warn!("Parse rejected: unsupported file type {:?}", extension);
            return ParseOutcome::invalid_file_type(
                format!("Unsupported file type: {extension}"),
                self.config.upload.sorted_extensions(),
            );
        }

        // 6. Size within the configured limit
        let file_size_mb = metadata.len() as f64 / BYTES_PER_MB;
        let limit = self.config.upload.max_file_size_mb;
        if file_size_mb > limit {
            warn!("Parse rejected: {:.2}MB exceeds the {}MB limit", file_size_mb, limit);
            return ParseOutcome::failure(
                ParseErrorCode::FileTooLarge,
                format!("File size {file_size_mb:.2}MB exceeds {limit}MB limit"),
            );
        }

        // All checks passed; upload and normalize the remote answer.
        let bytes = match tokio::fs::read(&resolved).await {
            Ok(bytes) => bytes,
            Err(read_error) => {
                error!("Failed to read {}: {}", resolved.display(), read_error);
                return ParseOutcome::failure(ParseErrorCode::InternalError, read_error.to_string());
            }
        };
        let filename = resolved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!("Uploading {} ({:.2}MB) to the Mataparser API", filename, file_size_mb);
        let upload = FileUpload {
            filename: filename.clone(),
            bytes,
        };
        match self.api.parse(upload, json_template).await {
            Ok(response) if response.status >= 400 => {
                warn!(
                    "Mataparser API rejected {} with status {}",
                    filename, response.status
                );
                ParseOutcome::api_error(response.status, response.body)
            }
            Ok(response) => match serde_json::from_str(&response.body) {
                Ok(data) => {
                    info!("Parsed {} successfully", filename);
                    ParseOutcome::success(data, ParseMetadata::new(filename, file_size_mb))
                }
                Err(body_error) => {
                    error!("Mataparser API returned an unparsable body: {}", body_error);
                    ParseOutcome::failure(ParseErrorCode::InternalError, body_error.to_string())
                }
            },
            Err(ApiCallError::Timeout) => {
                warn!("Request to Mataparser API timed out");
                ParseOutcome::failure(
                    ParseErrorCode::Timeout,
                    "Request to Mataparser API timed out",
                )
            }
            Err(ApiCallError::Transport(message)) => {
                warn!("Transport failure calling the Mataparser API: {}", message);
                ParseOutcome::failure(ParseErrorCode::RequestError, message)
            }
        }
    }

    fn resolve_path(&self, file_path: &str) -> Result<PathBuf, ParseOutcome> {
        let path = Path::new(file_path);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        match std::env::current_dir() {
            Ok(cwd) => Ok(cwd.join(path)),
            Err(cwd_error) => {
                error!("Could not resolve the working directory: {}", cwd_error);
                Err(ParseOutcome::failure(
                    ParseErrorCode::InternalError,
                    cwd_error.to_string(),
                ))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
