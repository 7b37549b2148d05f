//! Error types for the model registry.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during model lookup and generation.
#[derive(Debug, Error)]
pub enum Error {
    /// No adapter is registered under the logical model name.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The process-wide registry was read before it was installed.
    #[error("model registry has not been initialized")]
    RegistryUninitialized,

    /// The process-wide registry was installed twice.
    #[error("model registry is already initialized")]
    RegistryAlreadyInitialized,

    /// A credential needed by the adapter resolved to the unset sentinel.
    #[error("model {model} has no {field} configured")]
    Unconfigured {
        model: String,
        field: &'static str,
    },

    /// The conversation lacks the input this adapter needs.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// Provider API returned an error.
    #[error("provider API error: {0}")]
    ProviderApi(String),

    /// A long-running job did not finish within the polling budget.
    #[error("gave up polling {job} after {attempts} attempts")]
    PollTimeout { job: String, attempts: u32 },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::ModelNotFound("gpt-5".to_string());
        assert_eq!(err.to_string(), "model not found: gpt-5");
    }

    #[test]
    fn unconfigured_names_model_and_field() {
        let err = Error::Unconfigured {
            model: "o3".to_string(),
            field: "API key",
        };
        assert_eq!(err.to_string(), "model o3 has no API key configured");
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
