//! Flattening nested annotations into comparable tag sets.

use std::collections::BTreeSet;

use coda_core::ThemeMap;

use crate::types::CodeTag;

/// Flatten one entry's annotations into a set of [`CodeTag`]s at or above
/// the confidence threshold.
///
/// The threshold is inclusive; a detail without a confidence field counts
/// as 1.0, so it survives any threshold up to and including 1.0 (the
/// serde default supplies the 1.0 at parse time). The result is a set:
/// duplicates collapse, and precision/recall is computed on membership,
/// not multiplicity. An empty or absent annotation structure yields the
/// empty set, which is valid and feeds the opposing side's counts.
pub fn collect_tags(annotations: &ThemeMap, min_confidence: f64) -> BTreeSet<CodeTag> {
    let mut tags = BTreeSet::new();
    for (theme, codes) in annotations {
        for (code, detail) in codes {
            if detail.confidence >= min_confidence {
                tags.insert(CodeTag::new(theme.clone(), code.clone()));
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use coda_core::{CodeMap, Detail};

    fn theme_map(entries: &[(&str, &str, f64)]) -> ThemeMap {
        let mut map = ThemeMap::new();
        for &(theme, code, confidence) in entries {
            map.entry(theme.to_string())
                .or_insert_with(CodeMap::new)
                .insert(code.to_string(), Detail::new(confidence, "test"));
        }
        map
    }

    #[test]
    fn collect_tags_includes_tags_at_or_above_threshold() {
        let map = theme_map(&[("Cost", "Price", 0.5), ("Cost", "Fees", 0.49)]);
        let tags = collect_tags(&map, 0.5);
        assert!(tags.contains(&CodeTag::new("Cost", "Price")));
        assert!(!tags.contains(&CodeTag::new("Cost", "Fees")));
    }

    #[test]
    fn collect_tags_of_empty_annotations_is_empty() {
        assert!(collect_tags(&ThemeMap::new(), 0.5).is_empty());
    }

    #[test]
    fn missing_confidence_defaults_to_one_and_survives_any_valid_threshold() {
        let detail: Detail = serde_json::from_str(r#"{"annotator": "human"}"#).unwrap();
        let mut codes = CodeMap::new();
        codes.insert("Price".to_string(), detail);
        let mut map = ThemeMap::new();
        map.insert("Cost".to_string(), codes);

        assert_eq!(collect_tags(&map, 1.0).len(), 1);
        // A threshold above 1.0 excludes everything, defaults included.
        assert!(collect_tags(&map, 1.1).is_empty());
    }

    #[test]
    fn raising_the_threshold_only_shrinks_the_set() {
        let map = theme_map(&[
            ("Cost", "Price", 0.3),
            ("Cost", "Fees", 0.6),
            ("Speed", "Delay", 0.9),
        ]);
        let low = collect_tags(&map, 0.2);
        let mid = collect_tags(&map, 0.5);
        let high = collect_tags(&map, 0.8);

        assert!(mid.is_subset(&low));
        assert!(high.is_subset(&mid));
    }
}
