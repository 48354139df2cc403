//! Chat Model Port - transport contract for the LLM provider.
//!
//! A single request/response call to a chat-style completion endpoint,
//! carrying a system instruction and a user prompt and returning free-form
//! text. Prompt construction, response parsing, and fallback policy live in
//! the application layer; this port is transport only.

use async_trait::async_trait;

/// Port for chat-completion calls to an LLM provider.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Submits one completion request and returns the raw response text.
    async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, ChatModelError>;

    /// Issues a minimal round-trip request to check provider health.
    ///
    /// Callers treat any error as "unavailable"; this method never needs to
    /// distinguish beyond the error variant.
    async fn probe(&self) -> Result<(), ChatModelError>;
}

/// Chat model transport errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatModelError {
    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider returned a non-success status.
    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Provider response body could not be read or decoded.
    #[error("response parse error: {0}")]
    Parse(String),
}

impl ChatModelError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a provider-status error.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }
}
