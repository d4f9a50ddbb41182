//! Classification counters and derived metrics.

use serde::{Deserialize, Serialize};

/// True/false positive/negative counts for one aggregation bucket.
///
/// Constructed fresh per evaluation call; never shared between runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    /// Tags present in both auto and ground truth.
    pub true_positives: u64,
    /// Tags present only in the auto set.
    pub false_positives: u64,
    /// Tags present only in the ground truth.
    pub false_negatives: u64,
}

impl Counts {
    /// `tp / (tp + fp)`, or `0.0` when nothing was predicted.
    pub fn precision(&self) -> f64 {
        safe_div(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    /// `tp / (tp + fn)`, or `0.0` when the ground truth is empty.
    pub fn recall(&self) -> f64 {
        safe_div(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// `2tp / (2tp + fp + fn)`, or `0.0` on a zero denominator.
    pub fn f1(&self) -> f64 {
        safe_div(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }
}

/// Division resolving 0/0 to `0.0`.
///
/// Precision and recall are conventionally undefined at 0/0; reporting
/// `0.0` there is a policy choice, so empty buckets read as "no credit"
/// rather than raising or propagating NaN.
fn safe_div(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Derived precision/recall/F1 for one bucket of the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1: f64,
}

impl From<Counts> for Metrics {
    fn from(counts: Counts) -> Self {
        Self {
            precision: counts.precision(),
            recall: counts.recall(),
            f1: counts.f1(),
        }
    }
}

/// Global metrics plus the number of aligned pairs they cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1: f64,
    pub evaluated_entries: usize,
}

impl GlobalMetrics {
    /// Derive global metrics from the global counter and pair count.
    pub fn from_counts(counts: Counts, evaluated_entries: usize) -> Self {
        Self {
            precision: counts.precision(),
            recall: counts.recall(),
            f1: counts.f1(),
            evaluated_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_derive_precision_recall_and_f1() {
        let counts = Counts {
            true_positives: 1,
            false_positives: 0,
            false_negatives: 1,
        };
        assert_eq!(counts.precision(), 1.0);
        assert_eq!(counts.recall(), 0.5);
        assert!((counts.f1() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_denominators_resolve_to_zero_not_nan() {
        let counts = Counts::default();
        assert_eq!(counts.precision(), 0.0);
        assert_eq!(counts.recall(), 0.0);
        assert_eq!(counts.f1(), 0.0);
    }

    #[test]
    fn metrics_serialize_f1_as_f1_score() {
        let metrics = Metrics::from(Counts {
            true_positives: 2,
            false_positives: 0,
            false_negatives: 0,
        });
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["f1-score"], 1.0);
        assert!(json.get("f1").is_none());
    }

    #[test]
    fn global_metrics_carry_the_evaluated_entry_count() {
        let global = GlobalMetrics::from_counts(Counts::default(), 7);
        let json = serde_json::to_value(global).unwrap();
        assert_eq!(json["evaluated_entries"], 7);
    }
}
