//! Configuration module
//!
//! Configuration is built once and passed into constructors; nothing in the
//! request path reads environment variables or other ambient state.

use anyhow::{Context, Result};
use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// Connection settings for the remote document service.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    /// Bearer token attached to every request.
    pub auth_token: String,
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Build from environment: DOCSTREAM_API_URL (or API_URL) and
    /// DOCSTREAM_API_TOKEN (or API_TOKEN). Reads a `.env` file if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("DOCSTREAM_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let auth_token = env::var("DOCSTREAM_API_TOKEN")
            .or_else(|_| env::var("API_TOKEN"))
            .context("Missing authentication token. Set DOCSTREAM_API_TOKEN or API_TOKEN")?;

        let mut config = Self::new(base_url, auth_token);

        if let Ok(timeout) = env::var("DOCSTREAM_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout
                .parse()
                .context("DOCSTREAM_REQUEST_TIMEOUT_SECS must be an integer")?;
        }

        Ok(config)
    }
}

/// File constraints enforced before a payload reaches the transport.
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_extensions: [
                "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "csv", "jpg", "jpeg",
                "png", "tif", "tiff",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            allowed_content_types: [
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/vnd.ms-excel",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/vnd.ms-powerpoint",
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
                "text/plain",
                "text/csv",
                "image/jpeg",
                "image/png",
                "image/tiff",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig::new("https://docs.example.com/", "token");
        assert_eq!(config.base_url, "https://docs.example.com");
    }

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("https://docs.example.com", "token");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_default_limits_cover_documents() {
        let limits = UploadLimits::default();
        assert!(limits.allowed_extensions.contains(&"pdf".to_string()));
        assert!(limits
            .allowed_content_types
            .contains(&"application/pdf".to_string()));
        assert_eq!(limits.max_file_size_bytes, 50 * 1024 * 1024);
    }
}
