//! coda-core: core library for the coda thematic-annotation toolkit
//!
//! This crate provides the foundational components for coda:
//!
//! - **Annotation model** - [`AnnotationSet`], [`Entry`], and the
//!   theme → code → [`Detail`] nesting, with fail-fast loading
//! - **Pipelines** - [`PipelineRunner`] drives a [`PromptStrategy`]
//!   against a model provider to produce annotated sets
//! - **Run cache** - [`RunCache`] maps (input, model, pipeline) to
//!   previously annotated outputs

pub mod annotation;
pub mod cache;
pub mod error;
pub mod pipeline;

// Re-export key types for convenience
pub use annotation::{AnnotationSet, CodeMap, Codebook, CodebookCodes, Detail, Entry, ThemeMap};
pub use cache::{RunCache, RunKey};
pub use error::{AnnotationError, CacheError, CodaError, PipelineError};
pub use pipeline::{
    DetailedPrompt, FewShotPrompt, PipelineRun, PipelineRunner, PromptContext, PromptStrategy,
    RunRecord, SimplePrompt, annotated_output_path,
};
