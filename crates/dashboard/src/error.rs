//! Dashboard error types.

use aggregate::AggregateError;
use anomaly_facade::AnomalyError;
use data_facade::DataError;
use thiserror::Error;

/// Dashboard assembly and rendering errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Length mismatch in '{series}': {x} x values, {y} y values")]
    LengthMismatch { series: String, x: usize, y: usize },

    #[error("Series '{0}' has no points")]
    EmptySeries(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Anomaly(#[from] AnomalyError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
