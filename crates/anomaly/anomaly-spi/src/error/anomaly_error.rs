//! Anomaly detection error types.

use thiserror::Error;

/// Errors raised while fitting or scoring a detector.
#[derive(Debug, Error)]
pub enum AnomalyError {
    /// Fewer readings than the method needs.
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Detector not fitted: call fit() before detect()")]
    NotFitted,

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The series cannot be standardised or modelled, e.g. zero variance.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Numeric failure inside a model.
    #[error("Detection error: {0}")]
    DetectionError(String),
}

impl AnomalyError {
    /// Shorthand for an [`AnomalyError::InvalidParameter`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        AnomalyError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for anomaly detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;
