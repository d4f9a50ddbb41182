//! Model provider trait and implementations.
//!
//! The [`ModelProvider`] trait defines the unified interface for all text
//! generation backends. Callers hold a `Box<dyn ModelProvider>` and stay
//! agnostic about whether the model runs locally (Ollama) or behind an API
//! (OpenAI).

mod mock;
mod ollama;
mod openai;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Sampling options shared by all providers.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate per request.
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Trait for text generation providers.
///
/// Implementations handle the actual model call; prompt construction and
/// output parsing live with the caller.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g. "ollama", "openai").
    fn name(&self) -> &str;

    /// Model served by this provider instance (e.g. "qwen3:4b").
    fn model(&self) -> &str;

    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

impl std::fmt::Debug for dyn ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelProvider")
            .field("name", &self.name())
            .field("model", &self.model())
            .finish()
    }
}

/// Route a model name to the provider that serves it.
///
/// Names containing `gpt` go to OpenAI; `qwen` and `llama` families go to
/// the local Ollama instance. Anything else is [`Error::UnknownModel`].
pub fn provider_for_model(
    model: &str,
    options: GenerationOptions,
) -> Result<Box<dyn ModelProvider>> {
    let lower = model.to_lowercase();
    if lower.contains("gpt") {
        Ok(Box::new(OpenAiProvider::from_env(model, options)?))
    } else if lower.contains("qwen") || lower.contains("llama") {
        Ok(Box::new(OllamaProvider::new(model, options)))
    } else {
        Err(Error::UnknownModel(model.to_string()))
    }
}
