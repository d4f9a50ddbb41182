//! coda-models: model provider abstractions for coda.
//!
//! This crate provides the seam between annotation pipelines and the
//! models that do the annotating:
//!
//! - **Providers** - [`ModelProvider`] trait with [`OllamaProvider`],
//!   [`OpenAiProvider`], and a scriptable [`MockProvider`]
//! - **Routing** - [`provider_for_model`] maps a model name to the
//!   provider that serves it
//! - **Output salvage** - [`extract_json`] recovers JSON objects from
//!   fence-wrapped or prose-wrapped model output

mod error;
mod json;
pub mod providers;

pub use error::{Error, Result};
pub use json::extract_json;
pub use providers::{
    GenerationOptions, MockProvider, ModelProvider, OllamaProvider, OpenAiProvider,
    provider_for_model,
};
