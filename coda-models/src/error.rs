//! Error types for model providers.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during model operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No provider knows how to serve this model name.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// Credentials missing for a provider that needs them.
    #[error("missing API key: set {0}")]
    MissingApiKey(String),

    /// Provider API returned a non-success status.
    #[error("provider API error ({status}): {message}")]
    ProviderApi { status: u16, message: String },

    /// Provider returned a response with no usable content.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Model output could not be parsed as JSON.
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    /// Request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_unknown_model() {
        let err = Error::UnknownModel("mistral-nemo".to_string());
        assert_eq!(err.to_string(), "unknown model: mistral-nemo");
    }

    #[test]
    fn error_display_formats_provider_api() {
        let err = Error::ProviderApi {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
