//! Prompt construction strategies.
//!
//! Each strategy turns a survey question, a codebook, and one response
//! text into a prompt asking the model for the annotation JSON. The
//! runner is strategy-agnostic; swapping prompts never touches the
//! generate/parse/validate loop.

use std::collections::BTreeMap;

use tracing::warn;

use crate::annotation::{AnnotationSet, Codebook};

/// Everything a strategy needs to build one prompt.
pub struct PromptContext<'a> {
    /// The survey question the entry answers.
    pub question: &'a str,
    /// The researcher codebook.
    pub codebook: &'a Codebook,
    /// The response text to annotate.
    pub text: &'a str,
    /// Annotator tag the model should write into each detail.
    pub annotator: &'a str,
}

/// A prompt-construction strategy.
pub trait PromptStrategy: Send + Sync {
    /// Strategy name, used for cache keys and run records.
    fn name(&self) -> &str;

    /// One-time setup against the input set before any prompts are built.
    fn prepare(&mut self, _set: &AnnotationSet) {}

    /// Build the prompt for one entry.
    fn build_prompt(&self, ctx: &PromptContext<'_>) -> String;
}

/// JSON-quote a string for embedding in a prompt.
fn json_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Pretty-print the codebook as-is, descriptions included.
fn codebook_json(codebook: &Codebook) -> String {
    serde_json::to_string_pretty(codebook).unwrap_or_default()
}

/// Pretty-print the codebook flattened to `theme: [codes]`.
fn flat_codebook_json(codebook: &Codebook) -> String {
    let flat: BTreeMap<&str, Vec<&str>> = codebook
        .iter()
        .map(|(theme, codes)| (theme.as_str(), codes.code_names()))
        .collect();
    serde_json::to_string_pretty(&flat).unwrap_or_default()
}

/// Minimal zero-shot prompt: text, codebook, output schema.
#[derive(Debug, Default)]
pub struct SimplePrompt;

impl PromptStrategy for SimplePrompt {
    fn name(&self) -> &str {
        "simple"
    }

    fn build_prompt(&self, ctx: &PromptContext<'_>) -> String {
        format!(
            r#"You are a thematic annotator. Based on the following text and codebook,
return only a JSON object in the specified format (no explanations).

Text: {text}
Codebook: {codebook}

Output format:
{{
  "annotations": {{
    "theme_name": {{
      "code_name": {{"section": "[start:end]", "confidence": float, "annotator": "{annotator}"}}
    }}
  }}
}}"#,
            text = json_str(ctx.text),
            codebook = codebook_json(ctx.codebook),
            annotator = ctx.annotator,
        )
    }
}

/// Instruction-heavy zero-shot prompt.
///
/// Includes the question, numbered rules, and a codebook flattened to
/// bare code names so descriptions cannot leak into the output.
#[derive(Debug, Default)]
pub struct DetailedPrompt;

impl PromptStrategy for DetailedPrompt {
    fn name(&self) -> &str {
        "detailed"
    }

    fn build_prompt(&self, ctx: &PromptContext<'_>) -> String {
        format!(
            r#"You are a highly accurate thematic annotator. Given a survey question and its response, you apply qualitative codes strictly using the provided codebook to the response. Follow all instructions precisely and output *only* valid JSON.

INSTRUCTIONS:
1. Use only themes and codes that appear in the codebook. Never invent new codes.
2. Apply a code only if the text clearly supports it. Avoid speculative inference.
3. If a code applies to the entire text, set "section": "".
4. If a code applies to part of the text, use character index slicing: "[start:end]".
5. Confidence must be a float between 0 and 1.
6. If no codes apply, return: {{"annotations": {{}}}}
7. Think step-by-step internally, but output only the final JSON object.
8. Output strictly valid JSON -- no explanations, no notes, no markdown, no code fences.
9. Include only themes that contain at least one detected code.

OUTPUT SCHEMA (follow exactly):
{{
"annotations": {{
    "<theme-name>": {{
    "<code-name>": {{
        "section": "[start:end]",
        "confidence": float,
        "annotator": "{annotator}"
    }}
    }}
}}
}}

QUESTION:
{question}

CODEBOOK:
{codebook}

TEXT:
{text}

Return ONLY the JSON object."#,
            annotator = ctx.annotator,
            question = ctx.question,
            codebook = flat_codebook_json(ctx.codebook),
            text = json_str(ctx.text),
        )
    }
}

/// Few-shot prompt seeded with already-annotated entries from the input.
///
/// Example ids that are missing from the input or carry no annotations
/// are skipped with a warning; with no usable examples the prompt
/// degrades to zero-shot.
#[derive(Debug)]
pub struct FewShotPrompt {
    example_ids: Vec<u64>,
    examples_context: String,
}

impl FewShotPrompt {
    /// Create a few-shot strategy seeded with the given entry ids.
    pub fn new(example_ids: Vec<u64>) -> Self {
        Self {
            example_ids,
            examples_context: String::new(),
        }
    }

    /// Ids of the seed examples.
    pub fn example_ids(&self) -> &[u64] {
        &self.example_ids
    }

    fn build_examples_context(&self, set: &AnnotationSet) -> String {
        let mut examples = Vec::new();
        for &id in &self.example_ids {
            let Some(entry) = set.entry(id) else {
                warn!(id, "example id not found in input, skipping");
                continue;
            };
            if entry.annotations.is_empty() {
                warn!(id, "example entry has no annotations, skipping");
                continue;
            }
            let output = serde_json::json!({ "annotations": entry.annotations });
            examples.push(format!(
                "Example Input: {}\nExample Output: {}",
                json_str(&entry.text),
                output
            ));
        }
        if examples.is_empty() {
            warn!("no usable examples, prompt degrades to zero-shot");
        }
        examples.join("\n\n---\n\n")
    }
}

impl PromptStrategy for FewShotPrompt {
    fn name(&self) -> &str {
        "few-shot"
    }

    fn prepare(&mut self, set: &AnnotationSet) {
        self.examples_context = self.build_examples_context(set);
    }

    fn build_prompt(&self, ctx: &PromptContext<'_>) -> String {
        format!(
            r#"You are a thematic annotator. I will provide you with a Codebook and several labeled Examples.
Your task is to annotate the "Target Text" following the patterns shown in the examples.

Return **only** a JSON object (no markdown, no explanations).

**Crucially, you must assign a `confidence` rating as a float between 0.0 (low) and 1.0 (high) based on how certain you are of the annotation.**

=== CODEBOOK ===
{codebook}

=== EXAMPLES ===
{examples}

=== TARGET TEXT ===
Input: {text}

Output format:
{{
  "annotations": {{
    "theme_name": {{
      "code_name": {{"section": "[substring]", "confidence": float, "annotator": "{annotator}"}}
    }}
  }}
}}"#,
            codebook = flat_codebook_json(ctx.codebook),
            examples = self.examples_context,
            text = json_str(ctx.text),
            annotator = ctx.annotator,
        )
    }
}
