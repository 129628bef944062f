//! Chat transport
//!
//! Sends a composed prompt to the chat backend and returns its reply.
//! Failures are descriptive values; the session turns them into bot
//! messages. There is no automatic retry.

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpChatTransport;

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Backend(String),

    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}

/// Anything that can answer a prompt
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn query(&self, prompt: &str) -> Result<String, TransportError>;
}

/// Scripted transport for tests
///
/// Records every prompt. With a gate, each call waits for one
/// `notify_one` before answering.
#[cfg(test)]
pub struct MockTransport {
    script: parking_lot::Mutex<std::collections::VecDeque<Result<String, TransportError>>>,
    pub prompts: parking_lot::Mutex<Vec<String>>,
    gate: Option<std::sync::Arc<tokio::sync::Notify>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new(script: Vec<Result<String, TransportError>>) -> Self {
        Self {
            script: parking_lot::Mutex::new(script.into()),
            prompts: parking_lot::Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn gated(script: Vec<Result<String, TransportError>>, gate: std::sync::Arc<tokio::sync::Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(script)
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[cfg(test)]
#[async_trait]
impl ChatTransport for MockTransport {
    async fn query(&self, prompt: &str) -> Result<String, TransportError> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".to_string())))
    }
}
