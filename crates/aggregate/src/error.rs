//! Aggregation error types.

use thiserror::Error;

/// Aggregation errors.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// A group is too small or too uniform to estimate from. `got` counts the
    /// distinct values in the group.
    #[error("Insufficient data in group '{group}': required {required} distinct values, got {got}")]
    InsufficientData {
        group: String,
        required: usize,
        got: usize,
    },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Empty input")]
    EmptyInput,
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_names_group() {
        let err = AggregateError::InsufficientData {
            group: "2014".to_string(),
            required: 2,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data in group '2014': required 2 distinct values, got 1"
        );
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AggregateError>();
    }
}
