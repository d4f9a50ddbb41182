//! Ollama local model provider.
//!
//! Connects to a local Ollama instance for running models like Qwen or
//! Llama via the `/api/generate` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationOptions, ModelProvider};
use crate::error::{Error, Result};

/// Default Ollama API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Request body for Ollama's `/api/generate` endpoint.
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

/// Sampling options for Ollama.
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Response from Ollama's `/api/generate` endpoint.
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}

/// Provider for a local Ollama instance.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    options: GenerationOptions,
}

impl OllamaProvider {
    /// Create a provider pointing at `localhost:11434`.
    pub fn new(model: impl Into<String>, options: GenerationOptions) -> Self {
        Self::with_base_url(model, options, DEFAULT_BASE_URL)
    }

    /// Create a provider pointing at a custom Ollama endpoint.
    pub fn with_base_url(
        model: impl Into<String>,
        options: GenerationOptions,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            options,
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %self.model, prompt_len = prompt.len(), "ollama generate");

        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.options.temperature,
                num_predict: self.options.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi {
                status: status.as_u16(),
                message,
            });
        }

        let body: OllamaGenerateResponse = response.json().await?;
        if body.response.is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let provider = OllamaProvider::with_base_url(
            "qwen3:4b",
            GenerationOptions::default(),
            "http://192.168.1.10:11434/",
        );
        assert_eq!(provider.base_url, "http://192.168.1.10:11434");
    }

    #[test]
    fn provider_reports_name_and_model() {
        let provider = OllamaProvider::new("llama3.2:3b", GenerationOptions::default());
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3.2:3b");
    }

    #[test]
    fn generate_request_serializes_options() {
        let request = OllamaGenerateRequest {
            model: "qwen3:4b",
            prompt: "hello",
            stream: false,
            options: OllamaOptions {
                temperature: 0.5,
                num_predict: 256,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "qwen3:4b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 256);
    }
}
