//! Loading and saving annotation documents.
//!
//! Structural problems (missing required fields, malformed nesting,
//! duplicate entry ids) fail fast here, before any alignment or
//! annotation work starts.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::types::AnnotationSet;
use crate::error::AnnotationError;

impl AnnotationSet {
    /// Load and validate an annotation document from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnnotationError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AnnotationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "loading annotation set");
        Self::from_slice(&bytes)
    }

    /// Parse and validate an annotation document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AnnotationError> {
        let set: AnnotationSet = serde_json::from_slice(bytes)?;
        set.validate()?;
        Ok(set)
    }

    /// Write the document as pretty-printed JSON.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<(), AnnotationError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| AnnotationError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check invariants serde cannot express: entry ids must be unique.
    fn validate(&self) -> Result<(), AnnotationError> {
        let mut seen = HashSet::with_capacity(self.answers.len());
        for entry in &self.answers {
            if !seen.insert(entry.id) {
                return Err(AnnotationError::DuplicateId { id: entry.id });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_DOC: &str = r#"{
        "question": "Q17: What would improve the service?",
        "answers": [
            {"id": 1, "text": "cheaper fares"},
            {"id": 2, "text": "more buses"}
        ]
    }"#;

    #[test]
    fn from_slice_accepts_valid_document() {
        let set = AnnotationSet::from_slice(VALID_DOC.as_bytes()).unwrap();
        assert_eq!(set.answers.len(), 2);
    }

    #[test]
    fn from_slice_rejects_duplicate_ids() {
        let doc = r#"{
            "question": "Q17",
            "answers": [{"id": 5, "text": "a"}, {"id": 5, "text": "b"}]
        }"#;
        let err = AnnotationSet::from_slice(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, AnnotationError::DuplicateId { id: 5 }));
    }

    #[test]
    fn from_slice_rejects_non_json() {
        let err = AnnotationSet::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, AnnotationError::Malformed(_)));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = AnnotationSet::from_path("/nonexistent/answers.json").unwrap_err();
        assert!(matches!(err, AnnotationError::Read { .. }));
    }

    #[test]
    fn round_trip_through_disk_preserves_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");

        let set = AnnotationSet::from_slice(VALID_DOC.as_bytes()).unwrap();
        set.to_path(&path).unwrap();
        let reloaded = AnnotationSet::from_path(&path).unwrap();

        assert_eq!(reloaded, set);
    }
}
