//! Annotation document types.
//!
//! An [`AnnotationSet`] is one survey question with its responses. Each
//! [`Entry`] carries a nested theme → code → [`Detail`] structure; the
//! nesting is an explicit two-level mapping so malformed documents are
//! rejected during deserialization rather than silently skipped later.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Theme name → codes applied under that theme.
pub type ThemeMap = BTreeMap<String, CodeMap>;

/// Code name → annotation detail.
pub type CodeMap = BTreeMap<String, Detail>;

/// Researcher codebook: theme name → codes available under that theme.
pub type Codebook = BTreeMap<String, CodebookCodes>;

/// Codes for one codebook theme.
///
/// Input files come in two shapes: the newer `{code: description}` form
/// and the older bare list of code names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodebookCodes {
    /// `{code_name: description}`
    Described(BTreeMap<String, String>),
    /// `[code_name, ...]`
    Listed(Vec<String>),
}

impl CodebookCodes {
    /// Code names in this theme, descriptions dropped.
    pub fn code_names(&self) -> Vec<&str> {
        match self {
            CodebookCodes::Described(codes) => codes.keys().map(String::as_str).collect(),
            CodebookCodes::Listed(codes) => codes.iter().map(String::as_str).collect(),
        }
    }
}

/// One applied code: where it applies, how certain, and who applied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    /// Character slice of the response this code applies to
    /// (`"[start:end]"`), or empty for the whole text.
    #[serde(default)]
    pub section: String,
    /// Annotation certainty in `[0, 1]`. Absent means certain.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Who applied this code: a human tag or a model name.
    #[serde(default)]
    pub annotator: String,
}

/// Default confidence for details that omit the field.
fn default_confidence() -> f64 {
    1.0
}

impl Detail {
    /// A full-text detail with the given confidence and annotator.
    pub fn new(confidence: f64, annotator: impl Into<String>) -> Self {
        Self {
            section: String::new(),
            confidence,
            annotator: annotator.into(),
        }
    }
}

/// One survey response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier, unique within its set.
    pub id: u64,
    /// The response text.
    pub text: String,
    /// Applied codes; empty for unannotated entries.
    #[serde(default)]
    pub annotations: ThemeMap,
}

impl Entry {
    /// An unannotated entry.
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            annotations: ThemeMap::new(),
        }
    }
}

/// One survey question with its responses.
///
/// `question` and `answers` are required; a document missing either fails
/// deserialization. The codebook block is optional because evaluator-only
/// inputs (already-annotated files) may not carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    /// The survey question all entries answer.
    pub question: String,
    /// Researcher codebook, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Codebook>,
    /// The responses.
    pub answers: Vec<Entry>,
}

impl AnnotationSet {
    /// Look up an entry by id.
    pub fn entry(&self, id: u64) -> Option<&Entry> {
        self.answers.iter().find(|entry| entry.id == id)
    }
}
