//! HTTP chat backend client
//!
//! `POST <base>/query` with `{"prompt": ...}`; the backend answers
//! `{"response": ...}` or `{"error": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{ChatTransport, TransportError};

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct QueryReply {
    response: Option<String>,
    error: Option<String>,
}

/// Chat transport over HTTP
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    base_url: String,
    client: Client,
}

impl HttpChatTransport {
    /// Create a transport; `timeout` of `None` waits indefinitely
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Backend-reported error; quota messages count as rate limiting
fn backend_error(message: String) -> TransportError {
    let lower = message.to_lowercase();
    if lower.contains("429") || lower.contains("quota") {
        TransportError::RateLimited
    } else {
        TransportError::Backend(message)
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn query(&self, prompt: &str) -> Result<String, TransportError> {
        let url = format!("{}/query", self.base_url);

        tracing::debug!("Sending prompt to {} ({} characters)", url, prompt.chars().count());

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { prompt })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Network("Request timed out".to_string())
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::warn!("Chat backend returned {}", status);
            return match serde_json::from_str::<QueryReply>(&body) {
                Ok(QueryReply { error: Some(error), .. }) => Err(backend_error(error)),
                _ => Err(TransportError::Status {
                    status: status.as_u16(),
                    body,
                }),
            };
        }

        let reply: QueryReply = serde_json::from_str(&body)
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        match reply {
            QueryReply { error: Some(error), .. } => Err(backend_error(error)),
            QueryReply { response: Some(text), .. } => Ok(text),
            QueryReply { .. } => Err(TransportError::InvalidResponse(
                "missing response field".to_string(),
            )),
        }
    }
}
