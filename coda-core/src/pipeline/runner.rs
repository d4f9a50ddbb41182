//! The annotation run loop.
//!
//! [`PipelineRunner`] walks every entry of an input set, asks the model
//! for an annotation, and builds a new annotated set. The source set is
//! never mutated. Per-entry failures degrade to sentinel `Error`
//! annotations so one bad model response cannot sink a whole run; only
//! transport-level provider errors abort it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use coda_models::{ModelProvider, extract_json};

use super::strategy::{PromptContext, PromptStrategy};
use crate::annotation::{AnnotationSet, CodeMap, Detail, ThemeMap};
use crate::error::PipelineError;

/// Theme used for entries with blank text.
const BLANK_THEME: &str = "No Responses";
/// Code used for entries with blank text.
const BLANK_CODE: &str = "Blank";
/// Theme used for entries the model failed on.
const ERROR_THEME: &str = "Error";

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique id for this run.
    pub id: Uuid,
    /// Model that produced the annotations.
    pub model: String,
    /// Prompt strategy name.
    pub pipeline: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Entries processed.
    pub entries: usize,
    /// Entries that fell back to an `Error` annotation.
    pub failures: usize,
}

/// An annotated output set together with its run summary.
#[derive(Debug)]
pub struct PipelineRun {
    /// The newly built annotated set.
    pub output: AnnotationSet,
    /// Run summary.
    pub record: RunRecord,
}

/// Drives one prompt strategy against one provider.
pub struct PipelineRunner {
    provider: Box<dyn ModelProvider>,
    strategy: Box<dyn PromptStrategy>,
}

impl PipelineRunner {
    /// Create a runner from a provider and a prompt strategy.
    pub fn new(provider: Box<dyn ModelProvider>, strategy: Box<dyn PromptStrategy>) -> Self {
        Self { provider, strategy }
    }

    /// Annotate every entry of `set`, returning a new annotated set.
    ///
    /// Fails fast if the input carries no codebook; per-entry parse and
    /// format problems are recorded as `Error` annotations instead.
    pub async fn run(&mut self, set: &AnnotationSet) -> Result<PipelineRun, PipelineError> {
        let codebook = set.themes.clone().ok_or(PipelineError::MissingCodebook)?;
        self.strategy.prepare(set);

        let started_at = Utc::now();
        let annotator = self.provider.model().to_string();
        let total = set.answers.len();
        let mut output = set.clone();
        let mut failures = 0;

        for (index, entry) in output.answers.iter_mut().enumerate() {
            let text = entry.text.trim();

            if text.is_empty() {
                entry.annotations = sentinel(BLANK_THEME, BLANK_CODE, 1.0, &annotator);
                info!(id = entry.id, "blank text, annotated with '{BLANK_CODE}'");
                continue;
            }

            let prompt = self.strategy.build_prompt(&PromptContext {
                question: &set.question,
                codebook: &codebook,
                text,
                annotator: &annotator,
            });

            let response = self.provider.generate(&prompt).await?;
            entry.annotations = match parse_annotations(&response) {
                Ok(mut annotations) => {
                    normalize(&mut annotations, &annotator);
                    debug!(id = entry.id, "annotation parsed");
                    annotations
                }
                Err(fallback_code) => {
                    warn!(id = entry.id, code = fallback_code, "model output rejected");
                    debug!(id = entry.id, raw = %response, "raw model output");
                    failures += 1;
                    sentinel(ERROR_THEME, fallback_code, 0.0, &annotator)
                }
            };
            info!(id = entry.id, done = index + 1, total, "entry annotated");
        }

        let record = RunRecord {
            id: Uuid::new_v4(),
            model: annotator,
            pipeline: self.strategy.name().to_string(),
            started_at,
            entries: total,
            failures,
        };
        info!(
            run = %record.id,
            entries = record.entries,
            failures = record.failures,
            "pipeline run finished"
        );
        Ok(PipelineRun { output, record })
    }
}

/// Parse the model response into a [`ThemeMap`].
///
/// Returns the sentinel code name to use on failure: `InvalidJSON` when no
/// JSON object can be recovered, `InvalidFormat` when the object does not
/// match the theme → code → detail shape. A response without an
/// `annotations` field means no codes apply.
fn parse_annotations(response: &str) -> Result<ThemeMap, &'static str> {
    let value = extract_json(response).map_err(|_| "InvalidJSON")?;
    match value.get("annotations") {
        Some(annotations) => {
            serde_json::from_value(annotations.clone()).map_err(|_| "InvalidFormat")
        }
        None => Ok(ThemeMap::new()),
    }
}

/// Stamp the annotator tag onto every detail the model produced.
fn normalize(annotations: &mut ThemeMap, annotator: &str) {
    for codes in annotations.values_mut() {
        for detail in codes.values_mut() {
            if detail.annotator != annotator {
                detail.annotator = annotator.to_string();
            }
        }
    }
}

/// A single-code annotation block for blank and error entries.
fn sentinel(theme: &str, code: &str, confidence: f64, annotator: &str) -> ThemeMap {
    let mut codes = CodeMap::new();
    codes.insert(code.to_string(), Detail::new(confidence, annotator));
    let mut annotations = ThemeMap::new();
    annotations.insert(theme.to_string(), codes);
    annotations
}

/// Output path for an annotated copy of `input`: `<stem>_annotated.json`,
/// next to the input unless `output_dir` overrides the directory.
pub fn annotated_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "annotated".to_string());
    let file_name = format!("{stem}_annotated.json");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Codebook, CodebookCodes, Entry};
    use crate::pipeline::SimplePrompt;
    use coda_models::MockProvider;

    fn input_set(entries: Vec<Entry>) -> AnnotationSet {
        let mut book = Codebook::new();
        book.insert(
            "Cost".to_string(),
            CodebookCodes::Listed(vec!["Price".to_string()]),
        );
        AnnotationSet {
            question: "Q17".to_string(),
            themes: Some(book),
            answers: entries,
        }
    }

    fn runner(mock: MockProvider) -> PipelineRunner {
        PipelineRunner::new(Box::new(mock), Box::new(SimplePrompt))
    }

    #[tokio::test]
    async fn run_fails_without_codebook() {
        let set = AnnotationSet {
            question: "Q17".to_string(),
            themes: None,
            answers: vec![],
        };
        let err = runner(MockProvider::new("m")).run(&set).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingCodebook));
    }

    #[tokio::test]
    async fn run_applies_parsed_annotations() {
        let mock = MockProvider::new("qwen3:4b").with_response(
            r#"{"annotations": {"Cost": {"Price": {"section": "", "confidence": 0.8, "annotator": "qwen3:4b"}}}}"#,
        );
        let set = input_set(vec![Entry::new(1, "too expensive")]);

        let run = runner(mock).run(&set).await.unwrap();

        let detail = &run.output.answers[0].annotations["Cost"]["Price"];
        assert_eq!(detail.confidence, 0.8);
        assert_eq!(run.record.failures, 0);
        assert_eq!(run.record.entries, 1);
    }

    #[tokio::test]
    async fn run_does_not_mutate_the_source_set() {
        let mock = MockProvider::new("qwen3:4b")
            .with_response(r#"{"annotations": {"Cost": {"Price": {"section": ""}}}}"#);
        let set = input_set(vec![Entry::new(1, "too expensive")]);
        let before = set.clone();

        let run = runner(mock).run(&set).await.unwrap();

        assert_eq!(set, before);
        assert!(!run.output.answers[0].annotations.is_empty());
    }

    #[tokio::test]
    async fn blank_text_gets_blank_sentinel_without_a_model_call() {
        let mock = MockProvider::new("qwen3:4b");
        let set = input_set(vec![Entry::new(1, "   ")]);

        let run = runner(mock).run(&set).await.unwrap();

        let detail = &run.output.answers[0].annotations[BLANK_THEME][BLANK_CODE];
        assert_eq!(detail.confidence, 1.0);
        assert_eq!(run.record.failures, 0);
    }

    #[tokio::test]
    async fn unparseable_output_falls_back_to_invalid_json() {
        let mock = MockProvider::new("qwen3:4b").with_response("I refuse to answer in JSON.");
        let set = input_set(vec![Entry::new(1, "too expensive")]);

        let run = runner(mock).run(&set).await.unwrap();

        let detail = &run.output.answers[0].annotations[ERROR_THEME]["InvalidJSON"];
        assert_eq!(detail.confidence, 0.0);
        assert_eq!(run.record.failures, 1);
    }

    #[tokio::test]
    async fn wrong_shape_falls_back_to_invalid_format() {
        // Codes map to a bare string instead of a detail object.
        let mock = MockProvider::new("qwen3:4b")
            .with_response(r#"{"annotations": {"Cost": "Price"}}"#);
        let set = input_set(vec![Entry::new(1, "too expensive")]);

        let run = runner(mock).run(&set).await.unwrap();

        assert!(run.output.answers[0].annotations[ERROR_THEME].contains_key("InvalidFormat"));
        assert_eq!(run.record.failures, 1);
    }

    #[tokio::test]
    async fn missing_annotations_field_means_no_codes_apply() {
        let mock = MockProvider::new("qwen3:4b").with_response(r#"{"result": "nothing"}"#);
        let set = input_set(vec![Entry::new(1, "too expensive")]);

        let run = runner(mock).run(&set).await.unwrap();

        assert!(run.output.answers[0].annotations.is_empty());
        assert_eq!(run.record.failures, 0);
    }

    #[tokio::test]
    async fn annotator_tag_is_stamped_onto_model_output() {
        let mock = MockProvider::new("qwen3:4b").with_response(
            r#"{"annotations": {"Cost": {"Price": {"section": "", "annotator": "someone-else"}}}}"#,
        );
        let set = input_set(vec![Entry::new(1, "too expensive")]);

        let run = runner(mock).run(&set).await.unwrap();

        let detail = &run.output.answers[0].annotations["Cost"]["Price"];
        assert_eq!(detail.annotator, "qwen3:4b");
    }

    #[tokio::test]
    async fn provider_transport_error_aborts_the_run() {
        let mock = MockProvider::new("qwen3:4b");
        mock.queue_error(coda_models::Error::EmptyResponse);
        let set = input_set(vec![Entry::new(1, "too expensive")]);

        let err = runner(mock).run(&set).await.unwrap_err();
        assert!(matches!(err, PipelineError::Model(_)));
    }

    #[test]
    fn annotated_output_path_lands_next_to_input_by_default() {
        let path = annotated_output_path(Path::new("data/Q17.json"), None);
        assert_eq!(path, PathBuf::from("data/Q17_annotated.json"));
    }

    #[test]
    fn annotated_output_path_respects_output_dir() {
        let path = annotated_output_path(Path::new("data/Q17.json"), Some(Path::new("outputs")));
        assert_eq!(path, PathBuf::from("outputs/Q17_annotated.json"));
    }
}
