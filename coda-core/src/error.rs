//! Error types for coda-core

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for coda-core
#[derive(Error, Debug)]
pub enum CodaError {
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Structural errors in annotation documents.
///
/// These are unrecoverable for a run: a document missing `question` or
/// `answers`, malformed theme/code nesting, or duplicate entry ids is
/// rejected before any alignment or annotation starts.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed annotation document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Duplicate entry id {id} in annotation set")]
    DuplicateId { id: u64 },
}

/// Errors from annotation pipeline runs
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Input file has no codebook ('themes' block) to annotate with")]
    MissingCodebook,

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Model error: {0}")]
    Model(#[from] coda_models::Error),
}

/// Errors from the run cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to access cache at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode cache index: {0}")]
    Encode(#[from] serde_json::Error),
}
