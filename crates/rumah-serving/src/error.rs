//! Error types for the rumah-serving crate.
//!
//! Configuration-level errors are fatal at startup: no prediction can be made
//! until the artifacts are fixed. Invalid requests are the user's to correct.
//! Prediction errors are reported as a generic failure; the user may resubmit.

use rumah_core::CoreError;
use thiserror::Error;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors that can occur while loading artifacts or serving predictions.
#[derive(Debug, Error)]
pub enum ServingError {
    /// An artifact file is missing, unreadable or malformed.
    #[error("Failed to load artifact: {0}")]
    ArtifactLoadError(String),

    /// Decompressing an artifact failed.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// Artifacts are inconsistent with each other or with the column set.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The model or scaler failed while computing a prediction.
    #[error("Prediction failed: {0}")]
    PredictionError(String),

    /// The user's input was rejected.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServingError {
    /// Create an artifact load error.
    pub fn artifact_load(msg: impl Into<String>) -> Self {
        Self::ArtifactLoadError(msg.into())
    }

    /// Create a decompression error.
    pub fn decompression(msg: impl Into<String>) -> Self {
        Self::DecompressionError(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::PredictionError(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Check if this error must stop the process before serving.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ArtifactLoadError(_)
                | Self::DecompressionError(_)
                | Self::ConfigError(_)
        )
    }

    /// Check if this is a client error (bad request).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::PredictionError(_))
    }
}

impl From<CoreError> for ServingError {
    fn from(err: CoreError) -> Self {
        if err.is_input_error() {
            ServingError::InvalidRequest(err.to_string())
        } else {
            ServingError::ConfigError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServingError {
    fn from(err: serde_json::Error) -> Self {
        ServingError::ArtifactLoadError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ServingError {
    fn from(err: ndarray::ShapeError) -> Self {
        ServingError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumah_core::CategoryField;

    #[test]
    fn test_error_display() {
        let err = ServingError::ArtifactLoadError("scaler.json missing".to_string());
        assert_eq!(err.to_string(), "Failed to load artifact: scaler.json missing");

        let err = ServingError::prediction("non-finite output");
        assert_eq!(err.to_string(), "Prediction failed: non-finite output");
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            ServingError::artifact_load("x"),
            ServingError::ArtifactLoadError(_)
        ));
        assert!(matches!(
            ServingError::decompression("x"),
            ServingError::DecompressionError(_)
        ));
        assert!(matches!(ServingError::config("x"), ServingError::ConfigError(_)));
        assert!(matches!(
            ServingError::invalid_request("x"),
            ServingError::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_classification() {
        assert!(ServingError::config("shape").is_config_error());
        assert!(ServingError::decompression("gz").is_config_error());
        assert!(!ServingError::config("shape").is_client_error());

        assert!(ServingError::invalid_request("rooms").is_client_error());
        assert!(!ServingError::invalid_request("rooms").is_config_error());

        assert!(ServingError::prediction("nan").is_server_error());
        assert!(!ServingError::prediction("nan").is_config_error());
    }

    #[test]
    fn test_core_error_conversion() {
        let err: ServingError = CoreError::UnknownCategory {
            field: CategoryField::Location,
            value: "Atlantis".to_string(),
        }
        .into();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("Atlantis"));

        let err: ServingError = CoreError::EmptyColumnSet.into();
        assert!(err.is_config_error());
    }
}
