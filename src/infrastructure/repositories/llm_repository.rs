use async_trait::async_trait;

/// Failure from the LLM text-completion capability.
///
/// Throttling is kept apart from every other failure so callers can decide
/// what is worth retrying.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("throttled: {0}")]
    Throttled(String),
    #[error("{0}")]
    Service(String),
}

impl LlmError {
    pub fn is_throttling(&self) -> bool {
        matches!(self, LlmError::Throttled(_))
    }
}

/// Repository for single-prompt text completion.
/// Abstracts the underlying LLM provider (Bedrock, etc.)
#[async_trait]
pub trait LlmRepository: Send + Sync {
    /// Send one user prompt and return the model's plain-text answer
    ///
    /// # Errors
    /// Returns `LlmError::Throttled` when the provider rate-limits the call,
    /// `LlmError::Service` for anything else (including an empty answer)
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
