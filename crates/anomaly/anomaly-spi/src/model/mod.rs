//! Data models for anomaly detection.
//!
//! This module contains data structures used throughout the anomaly detection system.

mod anomaly_result;
mod detector_kind;
mod score_table;

pub use anomaly_result::AnomalyResult;
pub use detector_kind::DetectorKind;
pub use score_table::ScoreTable;
