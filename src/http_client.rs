//! HTTP transport for the completion service.
//!
//! This module provides a trait-based abstraction over the HTTP client,
//! enabling dependency injection and easy mocking in tests.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Trait for posting JSON to the completion endpoint.
///
/// This abstraction allows injecting mock HTTP clients for testing without
/// making real network requests.
///
/// # Example
///
/// ```ignore
/// use flem::http_client::{HttpClient, ReqwestHttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.post_json(
///     "https://api.openai.com/v1/chat/completions",
///     &[("Authorization", "Bearer sk-...")],
///     &serde_json::json!({"model": "gpt-3.5-turbo"}),
/// ).await?;
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a POST request with a JSON body and returns the response text.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to send the request to
    /// * `headers` - Key-value pairs of headers to include
    /// * `body` - The JSON body to send
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the response body cannot be read.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String>;
}

/// HTTP client implementation using reqwest.
///
/// No request timeout is configured: a hung endpoint blocks the tool until
/// the process is killed, a known limitation of the single-shot design.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default configuration.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<String> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        // Non-2xx statuses become errors here so the caller treats HTTP
        // failures and transport failures alike.
        let response = request.json(body).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
