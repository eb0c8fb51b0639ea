//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default Mataparser platform endpoint.
const DEFAULT_API_URL: &str = "https://mataparser.cloud/platform/api/v1";

/// Extensions the Mataparser platform accepts, lowercase with the dot.
const DEFAULT_ALLOWED_EXTENSIONS: [&str; 5] = [".pdf", ".docx", ".png", ".jpg", ".jpeg"];

/// Upload size ceiling in megabytes.
const DEFAULT_MAX_FILE_SIZE_MB: f64 = 2.0;

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Mataparser API endpoint and credentials.
    pub api: ApiConfig,

    /// Upload validation configuration.
    pub upload: UploadConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Mataparser API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Mataparser platform API.
    pub base_url: String,

    /// API key sent as the `x-api-key` header. Empty means unconfigured;
    /// the parse tool reports that per invocation instead of failing startup.
    pub key: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "key",
                if self.key.is_empty() {
                    &"[unset]"
                } else {
                    &"[REDACTED]"
                },
            )
            .finish()
    }
}

/// Upload validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Allowed file extensions, lowercase with the leading dot.
    pub allowed_extensions: BTreeSet<String>,

    /// Maximum upload size in megabytes.
    pub max_file_size_mb: f64,
}

impl UploadConfig {
    /// Whether a lowercase dotted extension is on the allow-list.
    pub fn extension_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.contains(extension)
    }

    /// The allow-list as a sorted vector, for error payloads.
    pub fn sorted_extensions(&self) -> Vec<String> {
        self.allowed_extensions.iter().cloned().collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "mataparser".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                key: String::new(),
            },
            upload: UploadConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Mataparser settings use the `MATAPARSER_` prefix, server-level
    /// settings the `MCP_` prefix. For example: `MATAPARSER_API_KEY`,
    /// `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(base_url) = std::env::var("MATAPARSER_API_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(api_key) = std::env::var("MATAPARSER_API_KEY") {
            config.api.key = api_key;
            info!("Mataparser API key loaded from environment");
        } else {
            warn!(
                "MATAPARSER_API_KEY not set - parse requests will be rejected \
                 until a key is configured"
            );
        }

        if let Ok(extensions) = std::env::var("MATAPARSER_ALLOWED_EXTENSIONS") {
            config.upload.allowed_extensions = parse_extension_list(&extensions);
            info!(
                "Allowed extensions overridden: {:?}",
                config.upload.allowed_extensions
            );
        }

        if let Ok(max_size) = std::env::var("MATAPARSER_MAX_FILE_SIZE_MB") {
            match max_size.parse::<f64>() {
                Ok(limit) if limit > 0.0 => config.upload.max_file_size_mb = limit,
                _ => warn!(
                    "Ignoring invalid MATAPARSER_MAX_FILE_SIZE_MB value {:?}, keeping {}MB",
                    max_size, config.upload.max_file_size_mb
                ),
            }
        }

        config
    }
}

/// Parse a comma-separated extension list, normalizing each entry to
/// lowercase with a leading dot. Empty entries are skipped.
fn parse_extension_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let lowered = entry.to_lowercase();
            if lowered.starts_with('.') {
                lowered
            } else {
                format!(".{lowered}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_match_platform_limits() {
        let config = Config::default();
        assert_eq!(config.server.name, "mataparser");
        assert_eq!(config.api.base_url, "https://mataparser.cloud/platform/api/v1");
        assert!(config.api.key.is_empty());
        assert_eq!(config.upload.allowed_extensions.len(), 5);
        assert!(config.upload.extension_allowed(".pdf"));
        assert!(config.upload.extension_allowed(".jpeg"));
        assert!(!config.upload.extension_allowed(".txt"));
        assert_eq!(config.upload.max_file_size_mb, 2.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_api_settings_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MATAPARSER_API_KEY", "test_key_12345");
            std::env::set_var("MATAPARSER_API_URL", "https://staging.mataparser.cloud/api/v1");
        }
        let config = Config::from_env();
        assert_eq!(config.api.key, "test_key_12345");
        assert_eq!(config.api.base_url, "https://staging.mataparser.cloud/api/v1");
        unsafe {
            std::env::remove_var("MATAPARSER_API_KEY");
            std::env::remove_var("MATAPARSER_API_URL");
        }
    }

    #[test]
    fn test_upload_overrides_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MATAPARSER_ALLOWED_EXTENSIONS", " PDF, .tiff ,,");
            std::env::set_var("MATAPARSER_MAX_FILE_SIZE_MB", "10");
        }
        let config = Config::from_env();
        assert_eq!(
            config.upload.sorted_extensions(),
            vec![".pdf".to_string(), ".tiff".to_string()]
        );
        assert_eq!(config.upload.max_file_size_mb, 10.0);
        unsafe {
            std::env::remove_var("MATAPARSER_ALLOWED_EXTENSIONS");
            std::env::remove_var("MATAPARSER_MAX_FILE_SIZE_MB");
        }
    }

    #[test]
    fn test_invalid_max_size_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MATAPARSER_MAX_FILE_SIZE_MB", "two");
        }
        assert_eq!(Config::from_env().upload.max_file_size_mb, 2.0);
        unsafe {
            std::env::set_var("MATAPARSER_MAX_FILE_SIZE_MB", "-1");
        }
        assert_eq!(Config::from_env().upload.max_file_size_mb, 2.0);
        unsafe {
            std::env::remove_var("MATAPARSER_MAX_FILE_SIZE_MB");
        }
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let api = ApiConfig {
            base_url: "https://mataparser.cloud/platform/api/v1".to_string(),
            key: "super_secret_key".to_string(),
        };
        let debug_str = format!("{:?}", api);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));

        let unset = ApiConfig {
            base_url: String::new(),
            key: String::new(),
        };
        assert!(format!("{:?}", unset).contains("unset"));
    }

    #[test]
    fn test_sorted_extensions_are_ordered() {
        let config = Config::default();
        assert_eq!(
            config.upload.sorted_extensions(),
            vec![
                ".docx".to_string(),
                ".jpeg".to_string(),
                ".jpg".to_string(),
                ".pdf".to_string(),
                ".png".to_string(),
            ]
        );
    }
}
