//! Annotation document model and loader.

mod loader;
mod types;

pub use types::{AnnotationSet, CodeMap, Codebook, CodebookCodes, Detail, Entry, ThemeMap};
