//! Salvaging JSON from raw model output.
//!
//! Models asked for "JSON only" still wrap their answer in markdown fences
//! or surround it with prose. [`extract_json`] recovers the outermost JSON
//! object before handing it to serde.

use crate::error::{Error, Result};

/// Extract and parse the outermost JSON object from raw model output.
///
/// Strips markdown code fences (```json ... ```) and any text before the
/// first `{` or after the last `}`. Fails with [`Error::InvalidJson`] if no
/// object is present or the candidate does not parse.
pub fn extract_json(raw: &str) -> Result<serde_json::Value> {
    let stripped = strip_fences(raw);

    let start = stripped
        .find('{')
        .ok_or_else(|| Error::InvalidJson(truncate(raw)))?;
    let end = stripped
        .rfind('}')
        .ok_or_else(|| Error::InvalidJson(truncate(raw)))?;
    if end < start {
        return Err(Error::InvalidJson(truncate(raw)));
    }

    let candidate = &stripped[start..=end];
    serde_json::from_str(candidate).map_err(|_| Error::InvalidJson(truncate(raw)))
}

/// Remove markdown code fences, keeping only fenced content if present.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line.
    let body = match after_open.find('\n') {
        Some(idx) => &after_open[idx + 1..],
        None => after_open,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Cap the raw output echoed into error messages.
fn truncate(raw: &str) -> String {
    const MAX: usize = 200;
    if raw.len() <= MAX {
        raw.to_string()
    } else {
        let mut end = MAX;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &raw[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_parses_bare_object() {
        let value = extract_json(r#"{"annotations": {}}"#).unwrap();
        assert!(value["annotations"].is_object());
    }

    #[test]
    fn extract_json_strips_code_fences() {
        let raw = "```json\n{\"annotations\": {\"Theme\": {}}}\n```";
        let value = extract_json(raw).unwrap();
        assert!(value["annotations"]["Theme"].is_object());
    }

    #[test]
    fn extract_json_ignores_surrounding_prose() {
        let raw = "Sure, here is the annotation:\n{\"annotations\": {}}\nHope that helps!";
        let value = extract_json(raw).unwrap();
        assert!(value["annotations"].is_object());
    }

    #[test]
    fn extract_json_strips_fence_without_language_tag() {
        let raw = "```\n{\"a\": 1}\n```";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn extract_json_rejects_output_without_object() {
        let err = extract_json("I could not find any codes.").unwrap_err();
        assert!(matches!(err, Error::InvalidJson(_)));
    }

    #[test]
    fn extract_json_rejects_malformed_object() {
        let err = extract_json("{\"annotations\": ").unwrap_err();
        assert!(matches!(err, Error::InvalidJson(_)));
    }

    #[test]
    fn extract_json_error_truncates_long_output() {
        let raw = "x".repeat(500);
        let err = extract_json(&raw).unwrap_err();
        let Error::InvalidJson(echoed) = err else {
            panic!("expected InvalidJson");
        };
        assert!(echoed.len() < 500);
        assert!(echoed.ends_with("..."));
    }
}
