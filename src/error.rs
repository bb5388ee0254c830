//! Error types for smartball.
//!
//! Almost every "failure" in this demo is a domain outcome (a failed jump),
//! not a system fault. The variants here cover the few real fault classes:
//! bad configuration, a malformed feature vector reaching the predictor, and
//! training being invoked on an empty batch.

use thiserror::Error;

/// Result type alias for smartball operations.
pub type BallResult<T> = Result<T, BallError>;

/// Unified error type for all smartball operations.
#[derive(Debug, Error)]
pub enum BallError {
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A feature vector did not match the predictor's fixed 4-field contract.
    #[error("Feature shape error: expected {expected} features, got {got}")]
    FeatureShape {
        /// Expected feature count.
        expected: usize,
        /// Observed feature count.
        got: usize,
    },

    /// Training was invoked with no examples.
    #[error("Training error: {0}")]
    Training(String),

    /// The world state violated a control-loop invariant.
    #[error("State error: {0}")]
    State(String),
}

impl BallError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a training error with a message.
    #[must_use]
    pub fn training(message: impl Into<String>) -> Self {
        Self::Training(message.into())
    }

    /// Create a state error with a message.
    #[must_use]
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Create a feature-shape error for the fixed 4-field contract.
    #[must_use]
    pub const fn feature_shape(expected: usize, got: usize) -> Self {
        Self::FeatureShape { expected, got }
    }
}
