//! Mock provider for testing.
//!
//! MockProvider allows scripting model responses for unit tests, enabling
//! fast, deterministic testing of pipeline logic. Queue responses with
//! [`MockProvider::with_response`] or [`MockProvider::queue_response`];
//! each `generate()` consumes one.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::ModelProvider;
use crate::error::{Error, Result};

/// Mock implementation of [`ModelProvider`] for testing.
pub struct MockProvider {
    model: String,
    responses: Mutex<VecDeque<Result<String>>>,
    /// Prompts seen by `generate()`, for assertions.
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a mock serving the given model name with no queued responses.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Builder-style: queue a successful response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.queue_response(response);
        self
    }

    /// Queue a successful response to be returned by the next `generate()`.
    pub fn queue_response(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue an error to be returned by the next `generate()`.
    pub fn queue_error(&self, error: Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Prompts passed to `generate()` so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(Error::EmptyResponse))
    }
}
