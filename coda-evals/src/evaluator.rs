//! The annotation evaluator.
//!
//! Aligns a machine-annotated set against human ground truth once, then
//! scores it at any confidence threshold. Each [`Evaluator::evaluate`]
//! call is a pure function of the aligned pairs and the threshold: all
//! accumulators are constructed fresh and returned in the report.

use std::collections::BTreeMap;

use serde::Serialize;

use coda_core::AnnotationSet;

use crate::align::{Alignment, align};
use crate::metrics::{Counts, GlobalMetrics, Metrics};
use crate::tags::collect_tags;
use crate::types::{CodeTag, EvalWarning};

/// Default confidence threshold for scoring.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Evaluation report at three aggregation levels.
///
/// Serializes as
/// `{ global: {...}, per_theme: {theme: {...}}, per_code: {"theme|code": {...}} }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    /// Metrics summed across all pairs and tags.
    pub global: GlobalMetrics,
    /// Metrics per theme; the theme buckets partition the global counts.
    pub per_theme: BTreeMap<String, Metrics>,
    /// Metrics per (theme, code), keyed by the serialized tag.
    pub per_code: BTreeMap<String, Metrics>,
}

/// Scores an auto-annotated set against ground truth.
pub struct Evaluator<'a> {
    alignment: Alignment<'a>,
}

impl<'a> Evaluator<'a> {
    /// Align the two sets. Alignment happens once; the same evaluator can
    /// score at any number of thresholds.
    pub fn new(auto: &'a AnnotationSet, gt: &'a AnnotationSet) -> Self {
        Self {
            alignment: align(auto, gt),
        }
    }

    /// Diagnostics collected during alignment.
    pub fn warnings(&self) -> &[EvalWarning] {
        &self.alignment.warnings
    }

    /// Auto entries excluded because the ground truth lacks their id.
    pub fn skipped(&self) -> usize {
        self.alignment.skipped
    }

    /// Number of aligned pairs that will be evaluated.
    pub fn evaluated_entries(&self) -> usize {
        self.alignment.pairs.len()
    }

    /// Compute precision/recall/F1 globally, per theme, and per code at
    /// the given inclusive confidence threshold.
    ///
    /// An empty alignment returns a well-formed all-zero report.
    pub fn evaluate(&self, min_confidence: f64) -> EvalReport {
        let mut global = Counts::default();
        let mut per_theme: BTreeMap<String, Counts> = BTreeMap::new();
        let mut per_code: BTreeMap<CodeTag, Counts> = BTreeMap::new();

        for pair in &self.alignment.pairs {
            let auto_tags = collect_tags(&pair.auto.annotations, min_confidence);
            let gt_tags = collect_tags(&pair.gt.annotations, min_confidence);

            for tag in auto_tags.intersection(&gt_tags) {
                global.true_positives += 1;
                per_theme.entry(tag.theme.clone()).or_default().true_positives += 1;
                per_code.entry(tag.clone()).or_default().true_positives += 1;
            }
            for tag in auto_tags.difference(&gt_tags) {
                global.false_positives += 1;
                per_theme.entry(tag.theme.clone()).or_default().false_positives += 1;
                per_code.entry(tag.clone()).or_default().false_positives += 1;
            }
            for tag in gt_tags.difference(&auto_tags) {
                global.false_negatives += 1;
                per_theme.entry(tag.theme.clone()).or_default().false_negatives += 1;
                per_code.entry(tag.clone()).or_default().false_negatives += 1;
            }
        }

        EvalReport {
            global: GlobalMetrics::from_counts(global, self.alignment.pairs.len()),
            per_theme: per_theme
                .into_iter()
                .map(|(theme, counts)| (theme, Metrics::from(counts)))
                .collect(),
            per_code: per_code
                .into_iter()
                .map(|(tag, counts)| (tag.key(), Metrics::from(counts)))
                .collect(),
        }
    }
}
