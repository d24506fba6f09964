//! Shared upstream HTTP client.
//!
//! Built once at startup and cloned into each adapter; `reqwest::Client` is
//! reference counted so clones share one connection pool.

use crate::core::config::HttpConfig;
use crate::core::error::FetchError;
use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Status and fully buffered body of one upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpClient {
    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Issues one GET and buffers the body. No retries.
    pub async fn get(&self, url: Url) -> Result<RawResponse, FetchError> {
        let redacted = redact(&url);
        debug!(url = %redacted, "Requesting upstream statement");

        let mut response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::transport(format!("request timeout for {redacted}"))
            } else if e.is_connect() {
                FetchError::transport(format!("connection failed for {redacted}"))
            } else {
                FetchError::transport(format!("request failed for {redacted}: {}", e.without_url()))
            }
        })?;

        let status = response.status().as_u16();
        let success = (200..300).contains(&status);
        // Error bodies are only classified, so they are capped rather than rejected.
        if success
            && response
                .content_length()
                .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(FetchError::parse(format!(
                "response body exceeds {} bytes",
                self.max_body_bytes
            )));
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            FetchError::transport(format!("failed to read response body: {}", e.without_url()))
        })? {
            if buffer.len() + chunk.len() > self.max_body_bytes {
                if success {
                    return Err(FetchError::parse(format!(
                        "response body exceeds {} bytes",
                        self.max_body_bytes
                    )));
                }
                let remaining = self.max_body_bytes - buffer.len();
                buffer.extend_from_slice(&chunk[..remaining]);
                break;
            }
            buffer.extend_from_slice(&chunk);
        }

        let body = if success {
            String::from_utf8(buffer)
                .map_err(|e| FetchError::parse(format!("response body is not UTF-8: {e}")))?
        } else {
            String::from_utf8_lossy(&buffer).into_owned()
        };
        debug!(status, bytes = body.len(), "Received upstream response");
        Ok(RawResponse { status, body })
    }
}

/// Renders a URL for logs with the API key masked.
pub fn redact(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k.eq_ignore_ascii_case("apikey") {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    if !pairs.is_empty() {
        masked.query_pairs_mut().clear().extend_pairs(pairs);
    }
    masked.to_string()
}
