//! HTTP client for the Docstream document service.
//!
//! Provides a minimal client with bearer auth, generic GET and multipart
//! POST helpers, and the document endpoints (`DocumentsApi`) that implement
//! the core transport and catalog traits.

pub mod documents;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use docstream_core::{ClientConfig, TransportError};

pub use documents::DocumentsApi;

/// API version prefix shared by every endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Error body shape of non-2xx responses. Servers vary between `detail`,
/// `message`, and `error`; the first one present wins.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// HTTP client for the document service with bearer auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("Authorization", format!("Bearer {}", self.auth_token))
    }

    /// GET request, deserializing the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::decode_json(response).await
    }

    /// POST a multipart form, deserializing the JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, TransportError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Self::decode_json(response).await
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }

    /// Build the `TransportError` for a non-2xx response, preferring the
    /// human-readable field of the JSON error body over the raw text.
    async fn error_from_response(response: Response) -> TransportError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.detail.or(body.message).or(body.error))
            .unwrap_or_else(|| {
                if text.is_empty() {
                    "Unknown error".to_string()
                } else {
                    text
                }
            });

        TransportError::Api { status, message }
    }
}
