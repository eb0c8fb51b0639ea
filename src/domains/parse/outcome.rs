//! Parse outcome types.
//!
//! Every invocation of the parse operation resolves to exactly one
//! `ParseOutcome`: a success carrying the remote API's JSON payload, or a
//! failure carrying a stable error code and a human-readable message. Both
//! variants serialize to the flat `{"success": ...}` object that callers
//! consume.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Stable machine-readable error codes for parse failures.
///
/// The wire form is the SCREAMING_SNAKE_CASE name (see [`as_str`]); callers
/// branch on these strings to decide whether to retry, pick another file, or
/// give up.
///
/// [`as_str`]: ParseErrorCode::as_str
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    /// No API key is configured for the parse API.
    ApiKeyRequired,
    /// The JSON template argument was empty.
    JsonTemplateRequired,
    /// The JSON template argument was not syntactically valid JSON.
    InvalidJsonTemplate,
    /// The file path did not resolve to an existing file.
    FileNotFound,
    /// The file's extension is not in the configured allow-list.
    InvalidFileType,
    /// The file exceeds the configured size limit.
    FileTooLarge,
    /// The remote API rejected the request with a 4xx/5xx status.
    ApiError,
    /// The remote call did not complete within the request timeout.
    Timeout,
    /// A transport-level failure occurred before a response was received.
    RequestError,
    /// Catch-all for anything unanticipated; nothing escapes as a panic.
    InternalError,
}

impl ParseErrorCode {
    /// The wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiKeyRequired => "API_KEY_REQUIRED",
            Self::JsonTemplateRequired => "JSON_TEMPLATE_REQUIRED",
            Self::InvalidJsonTemplate => "INVALID_JSON_TEMPLATE",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::ApiError => "API_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::RequestError => "REQUEST_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata reported alongside a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseMetadata {
    /// Base name of the uploaded file.
    pub filename: String,
    /// File size in megabytes, rounded to two decimals.
    pub file_size_mb: f64,
}

impl ParseMetadata {
    /// Build metadata, rounding the size to two decimals.
    pub fn new(filename: impl Into<String>, file_size_mb: f64) -> Self {
        Self {
            filename: filename.into(),
            file_size_mb: (file_size_mb * 100.0).round() / 100.0,
        }
    }
}

/// A normalized parse failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// Stable error code.
    pub code: ParseErrorCode,
    /// Human-readable description of what went wrong.
    pub message: String,
    /// For INVALID_FILE_TYPE: the configured allow-list, sorted.
    pub allowed_extensions: Option<Vec<String>>,
    /// For API_ERROR: the HTTP status the remote returned.
    pub status_code: Option<u16>,
}

/// The result of one parse invocation.
///
/// Exactly one of the two variants is produced per call; the handler never
/// panics past its boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The remote API accepted the file and returned a JSON body.
    Success {
        /// The parsed response body, passed through verbatim.
        data: Value,
        /// File metadata for the caller's bookkeeping.
        metadata: ParseMetadata,
    },
    /// A local validation or remote failure, normalized.
    Failure(ParseFailure),
}

impl ParseOutcome {
    /// Build a success outcome.
    pub fn success(data: Value, metadata: ParseMetadata) -> Self {
        Self::Success { data, metadata }
    }

    /// Build a plain failure with a code and message.
    pub fn failure(code: ParseErrorCode, message: impl Into<String>) -> Self {
        Self::Failure(ParseFailure {
            code,
            message: message.into(),
            allowed_extensions: None,
            status_code: None,
        })
    }

    /// Build an INVALID_FILE_TYPE failure carrying the allow-list.
    pub fn invalid_file_type(message: impl Into<String>, allowed_extensions: Vec<String>) -> Self {
        Self::Failure(ParseFailure {
            code: ParseErrorCode::InvalidFileType,
            message: message.into(),
            allowed_extensions: Some(allowed_extensions),
            status_code: None,
        })
    }

    /// Build an API_ERROR failure carrying the remote status.
    pub fn api_error(status_code: u16, body: impl Into<String>) -> Self {
        Self::Failure(ParseFailure {
            code: ParseErrorCode::ApiError,
            message: body.into(),
            allowed_extensions: None,
            status_code: Some(status_code),
        })
    }

    /// Whether this outcome is the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The error code, if this outcome is a failure.
    pub fn error_code(&self) -> Option<ParseErrorCode> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure.code),
        }
    }
}

/// Serializes to the flat wire object: `success` first, then the
/// variant-specific fields. Optional failure extras are omitted when absent.
impl Serialize for ParseOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success { data, metadata } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.serialize_entry("metadata", metadata)?;
                map.end()
            }
            Self::Failure(failure) => {
                let len = 3
                    + usize::from(failure.allowed_extensions.is_some())
                    + usize::from(failure.status_code.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", failure.code.as_str())?;
                map.serialize_entry("message", &failure.message)?;
                if let Some(extensions) = &failure.allowed_extensions {
                    map.serialize_entry("allowed_extensions", extensions)?;
                }
                if let Some(status) = failure.status_code {
                    map.serialize_entry("status_code", &status)?;
                }
                map.end()
            }
        }
    }
}
