//! coda-evals: scoring machine annotations against human ground truth.
//!
//! The evaluator aligns two [`coda_core::AnnotationSet`]s by entry id,
//! flattens each aligned entry's annotations into [`CodeTag`] sets at a
//! confidence threshold, and derives precision/recall/F1 at three
//! levels: global, per theme, and per (theme, code).
//!
//! # Quick start
//!
//! ```
//! use coda_core::AnnotationSet;
//! use coda_evals::{DEFAULT_MIN_CONFIDENCE, Evaluator};
//!
//! let auto: AnnotationSet = serde_json::from_str(
//!     r#"{"question": "Q17", "answers": []}"#,
//! ).unwrap();
//! let gt = auto.clone();
//!
//! let evaluator = Evaluator::new(&auto, &gt);
//! let report = evaluator.evaluate(DEFAULT_MIN_CONFIDENCE);
//! assert_eq!(report.global.evaluated_entries, 0);
//! ```

mod align;
mod evaluator;
mod metrics;
mod tags;
mod types;

pub use align::{AlignedPair, Alignment, align};
pub use evaluator::{DEFAULT_MIN_CONFIDENCE, EvalReport, Evaluator};
pub use metrics::{Counts, GlobalMetrics, Metrics};
pub use tags::collect_tags;
pub use types::{CodeTag, EvalWarning};
