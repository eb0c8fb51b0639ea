//! Mataparser API client.
//!
//! Wraps the remote `/parse` endpoint behind the [`ParserApi`] trait so the
//! parse pipeline can be exercised against a mock. The real client uploads
//! the file as multipart form data and reports the raw status and body back
//! to the caller without interpreting them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::core::config::ApiConfig;

/// Hard ceiling on a single parse request, connection through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Request / Response Types
// ============================================================================

/// A file ready to upload: base name plus raw contents.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A raw response from the parse endpoint, any status.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Failure to obtain a response at all. Non-2xx statuses are not errors at
/// this layer; they arrive as an [`ApiResponse`].
#[derive(Debug, Clone, Error)]
pub enum ApiCallError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Transport(String),
}

/// The surface the parse pipeline talks to.
#[async_trait]
pub trait ParserApi: Send + Sync {
    /// Upload a file and template, returning whatever the remote answered.
    async fn parse(
        &self,
        upload: FileUpload,
        json_template: &str,
    ) -> Result<ApiResponse, ApiCallError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client for the Mataparser platform API.
#[derive(Debug, Clone)]
pub struct MataparserClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl MataparserClient {
    /// Build a client from the API configuration.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.key.clone(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/parse", self.base_url)
    }

    fn map_error(error: reqwest::Error) -> ApiCallError {
        if error.is_timeout() {
            ApiCallError::Timeout
        } else {
            ApiCallError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl ParserApi for MataparserClient {
    async fn parse(
        &self,
        upload: FileUpload,
        json_template: &str,
    ) -> Result<ApiResponse, ApiCallError> {
        let endpoint = self.endpoint();
        debug!(
            "POST {} ({} bytes as {})",
            endpoint,
            upload.bytes.len(),
            upload.filename
        );

        let form = Form::new()
            .part("file", Part::bytes(upload.bytes).file_name(upload.filename))
            .text("json_template", json_template.to_string());

        let response = self
            .http
            .post(&endpoint)
            .header("x-api-key", &self.api_key)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(Self::map_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::map_error)?;

        debug!("Mataparser API answered with status {}", status);
        Ok(ApiResponse { status, body })
    }
}

// ============================================================================
// Tests
// ============================================================================
