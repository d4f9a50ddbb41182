//! Annotation pipelines: prompt strategies and the run loop.

mod runner;
mod strategy;

pub use runner::{PipelineRun, PipelineRunner, RunRecord, annotated_output_path};
pub use strategy::{DetailedPrompt, FewShotPrompt, PromptContext, PromptStrategy, SimplePrompt};
