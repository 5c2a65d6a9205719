// src/providers/mod.rs

use async_trait::async_trait;

use crate::errors::ProviderError;

pub mod openai;

/// One chat completion call: a system instruction plus a single user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A common trait for Large Language Model (LLM) providers.
///
/// Object safe so the solver can hold any backend (or a test stub) behind an `Arc`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends `request` to the model and returns its raw text output.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}
