//! Pairing auto-annotated entries with their ground-truth counterparts.
//!
//! Alignment is by identifier, not position: the auto file may hold a
//! strict subset of the ground truth's entries (sampled or incremental
//! runs), or entries out of order. Every exclusion is observable through
//! the skip counter and the collected warnings; nothing is dropped
//! silently.

use std::collections::HashMap;

use tracing::warn;

use coda_core::{AnnotationSet, Entry};

use crate::types::EvalWarning;

/// An (auto, ground-truth) entry pair sharing the same identifier.
#[derive(Debug, Clone, Copy)]
pub struct AlignedPair<'a> {
    /// Machine-produced entry.
    pub auto: &'a Entry,
    /// Human-annotated entry.
    pub gt: &'a Entry,
}

/// Result of aligning two annotation sets.
#[derive(Debug)]
pub struct Alignment<'a> {
    /// Aligned pairs, in auto-set order.
    pub pairs: Vec<AlignedPair<'a>>,
    /// Auto entries excluded because the ground truth lacks their id.
    pub skipped: usize,
    /// Non-fatal diagnostics raised during alignment.
    pub warnings: Vec<EvalWarning>,
}

/// Align `auto` entries against `gt` by identifier.
pub fn align<'a>(auto: &'a AnnotationSet, gt: &'a AnnotationSet) -> Alignment<'a> {
    let mut warnings = Vec::new();

    if auto.question != gt.question {
        warnings.push(EvalWarning::QuestionMismatch);
    }

    let gt_by_id: HashMap<u64, &Entry> = gt.answers.iter().map(|entry| (entry.id, entry)).collect();

    let mut pairs = Vec::with_capacity(auto.answers.len());
    let mut skipped = 0;
    for auto_entry in &auto.answers {
        match gt_by_id.get(&auto_entry.id) {
            Some(gt_entry) => {
                if auto_entry.text.trim() != gt_entry.text.trim() {
                    warnings.push(EvalWarning::TextMismatch { id: auto_entry.id });
                }
                pairs.push(AlignedPair {
                    auto: auto_entry,
                    gt: gt_entry,
                });
            }
            None => {
                warnings.push(EvalWarning::UnmatchedEntry { id: auto_entry.id });
                skipped += 1;
            }
        }
    }

    for warning in &warnings {
        warn!(%warning, "alignment");
    }

    Alignment {
        pairs,
        skipped,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(question: &str, entries: Vec<Entry>) -> AnnotationSet {
        AnnotationSet {
            question: question.to_string(),
            themes: None,
            answers: entries,
        }
    }

    #[test]
    fn align_pairs_entries_by_id_not_position() {
        let auto = set("Q", vec![Entry::new(2, "b"), Entry::new(1, "a")]);
        let gt = set("Q", vec![Entry::new(1, "a"), Entry::new(2, "b")]);

        let alignment = align(&auto, &gt);

        assert_eq!(alignment.pairs.len(), 2);
        // Auto-set order is preserved.
        assert_eq!(alignment.pairs[0].auto.id, 2);
        assert_eq!(alignment.pairs[0].gt.id, 2);
        assert!(alignment.warnings.is_empty());
    }

    #[test]
    fn align_accepts_auto_subset_of_ground_truth() {
        let auto = set("Q", vec![Entry::new(2, "b")]);
        let gt = set("Q", vec![Entry::new(1, "a"), Entry::new(2, "b")]);

        let alignment = align(&auto, &gt);

        assert_eq!(alignment.pairs.len(), 1);
        assert_eq!(alignment.skipped, 0);
    }

    #[test]
    fn align_skips_and_counts_unmatched_auto_entries() {
        let auto = set("Q", vec![Entry::new(1, "a"), Entry::new(99, "orphan")]);
        let gt = set("Q", vec![Entry::new(1, "a")]);

        let alignment = align(&auto, &gt);

        assert_eq!(alignment.pairs.len(), 1);
        assert_eq!(alignment.skipped, 1);
        assert!(
            alignment
                .warnings
                .contains(&EvalWarning::UnmatchedEntry { id: 99 })
        );
    }

    #[test]
    fn align_warns_on_text_mismatch_but_keeps_the_pair() {
        let auto = set("Q", vec![Entry::new(1, "the original text")]);
        let gt = set("Q", vec![Entry::new(1, "edited text")]);

        let alignment = align(&auto, &gt);

        assert_eq!(alignment.pairs.len(), 1);
        assert!(
            alignment
                .warnings
                .contains(&EvalWarning::TextMismatch { id: 1 })
        );
    }

    #[test]
    fn align_ignores_whitespace_when_comparing_text() {
        let auto = set("Q", vec![Entry::new(1, "  same text \n")]);
        let gt = set("Q", vec![Entry::new(1, "same text")]);

        let alignment = align(&auto, &gt);

        assert!(alignment.warnings.is_empty());
    }

    #[test]
    fn align_warns_on_question_mismatch_without_blocking() {
        let auto = set("Q17", vec![Entry::new(1, "a")]);
        let gt = set("Q18", vec![Entry::new(1, "a")]);

        let alignment = align(&auto, &gt);

        assert_eq!(alignment.pairs.len(), 1);
        assert!(alignment.warnings.contains(&EvalWarning::QuestionMismatch));
    }

    #[test]
    fn align_of_empty_auto_set_yields_no_pairs() {
        let auto = set("Q", vec![]);
        let gt = set("Q", vec![Entry::new(1, "a")]);

        let alignment = align(&auto, &gt);

        assert!(alignment.pairs.is_empty());
        assert_eq!(alignment.skipped, 0);
        assert!(alignment.warnings.is_empty());
    }
}
