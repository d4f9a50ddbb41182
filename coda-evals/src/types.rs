//! Core types for the evaluator.

use std::fmt;

/// A (theme, code) pair: the atomic unit of comparison.
///
/// Confidence and section are discarded for scoring; two annotations of
/// the same code under the same theme compare equal no matter where in
/// the text they point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeTag {
    /// Top-level qualitative category.
    pub theme: String,
    /// Specific label within the theme.
    pub code: String,
}

impl CodeTag {
    /// Create a tag from a theme and code name.
    pub fn new(theme: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            code: code.into(),
        }
    }

    /// Serialized report key: `theme|code`.
    ///
    /// The separator is not escaped; a theme or code name containing `|`
    /// produces an ambiguous key. Internal accumulation keys by the tag
    /// itself, so only serialized report output is affected.
    pub fn key(&self) -> String {
        format!("{}|{}", self.theme, self.code)
    }
}

impl fmt::Display for CodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.theme, self.code)
    }
}

/// Non-fatal diagnostic raised during alignment.
///
/// Warnings are collected values rather than console output so callers
/// can assert on them; none of them stops an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalWarning {
    /// The two sets answer different top-level questions.
    QuestionMismatch,
    /// Aligned entries disagree on text after trimming whitespace.
    TextMismatch { id: u64 },
    /// An auto entry has no ground-truth counterpart and was skipped.
    UnmatchedEntry { id: u64 },
}

impl fmt::Display for EvalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalWarning::QuestionMismatch => {
                write!(f, "questions differ between auto and ground-truth sets")
            }
            EvalWarning::TextMismatch { id } => {
                write!(f, "text mismatch for entry {id}, evaluating as-is")
            }
            EvalWarning::UnmatchedEntry { id } => {
                write!(
                    f,
                    "entry {id} present in auto set but not in ground truth, skipped"
                )
            }
        }
    }
}
