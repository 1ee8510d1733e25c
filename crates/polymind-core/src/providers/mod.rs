//! LLM completion providers
//!
//! Agents and the service layer talk to the model through the
//! [`CompletionProvider`] trait, so tests can swap in scripted fakes and
//! alternative backends can be added without touching the agent loop.

pub mod openai;

pub use openai::OpenAiCompletions;

use async_trait::async_trait;

use crate::error::AiError;

/// Single-prompt text completion
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    fn model(&self) -> &str;

    /// Complete `prompt`, returning the model's text
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AiError>;
}
