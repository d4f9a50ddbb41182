//! CLI configuration loaded from `config.toml`.
//!
//! Optional file under the coda config dir; every field has a default so
//! a missing file is not an error. `CODA_CONFIG_PATH` overrides the
//! location (useful for isolated tests).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default model when neither flag nor config names one.
const DEFAULT_MODEL: &str = "qwen3:4b";

/// Raw on-disk shape; all fields optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    model: Option<String>,
    min_confidence: Option<f64>,
    #[serde(default)]
    ollama: RawOllamaSection,
}

#[derive(Debug, Default, Deserialize)]
struct RawOllamaSection {
    base_url: Option<String>,
}

/// Resolved configuration with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CodaConfig {
    /// Default model for `coda annotate`.
    pub model: String,
    /// Default confidence threshold for `coda eval`.
    pub min_confidence: f64,
    /// Custom Ollama endpoint, when set.
    pub ollama_base_url: Option<String>,
}

impl Default for CodaConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            min_confidence: coda_evals::DEFAULT_MIN_CONFIDENCE,
            ollama_base_url: None,
        }
    }
}

impl CodaConfig {
    /// Load configuration, falling back to defaults if no file exists.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            model: raw.model.unwrap_or(defaults.model),
            min_confidence: raw.min_confidence.unwrap_or(defaults.min_confidence),
            ollama_base_url: raw.ollama.base_url,
        }
    }
}

/// Config file path; `CODA_CONFIG_PATH` overrides the XDG default.
fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CODA_CONFIG_PATH") {
        PathBuf::from(path)
    } else {
        coda_paths::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_raw_config_is_empty() {
        let config = CodaConfig::from_raw(RawConfig::default());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.min_confidence, 0.5);
        assert!(config.ollama_base_url.is_none());
    }

    #[test]
    fn raw_values_override_defaults() {
        let raw: RawConfig = toml::from_str(
            r#"
            model = "gpt-4o-mini"
            min_confidence = 0.7

            [ollama]
            base_url = "http://192.168.1.10:11434"
            "#,
        )
        .unwrap();
        let config = CodaConfig::from_raw(raw);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.min_confidence, 0.7);
        assert_eq!(
            config.ollama_base_url.as_deref(),
            Some("http://192.168.1.10:11434")
        );
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let raw: RawConfig = toml::from_str(r#"model = "llama3.2:3b""#).unwrap();
        let config = CodaConfig::from_raw(raw);
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(config.min_confidence, 0.5);
    }
}
