//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for chat-completion style text generation
///
/// Implementations:
/// - `GeminiChat`: Google Generative Language API (gemini-1.5-flash)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a fully composed prompt and return the model's text output
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
