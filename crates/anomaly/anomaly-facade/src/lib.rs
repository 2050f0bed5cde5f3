//! Anomaly Detection Facade
//!
//! Unified re-exports for the anomaly detection module.
//!
//! This facade provides a single entry point to all anomaly detection functionality:
//! - `AnomalyDetector` trait, `AnomalyResult` and `ScoreTable` from SPI
//! - Detector and pipeline configuration from API
//! - The six detectors, threshold rules and `ScoringPipeline` from Core
//!
//! # Example
//!
//! ```rust
//! use anomaly_facade::prelude::*;
//!
//! let values = [10.0, 12.0, 11.0, 100.0, 10.5];
//! let table = ScoringPipeline::new()
//!     .with(DetectorKind::Hotelling)
//!     .run(&values)
//!     .unwrap();
//! assert_eq!(table.flagged_indices(DetectorKind::Hotelling), vec![3]);
//! ```

// Re-export everything from SPI
pub use anomaly_spi::*;

// Re-export everything from API
pub use anomaly_api::*;

// Re-export everything from Core
pub use anomaly_core::*;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{AnomalyDetector, AnomalyResult, DetectorKind, ScoreTable};
    pub use crate::{ChangeFinderDetector, HotellingDetector, IsolationForestDetector};
    pub use crate::{LofDetector, OneClassSvmDetector, VarianceBandDetector};
    pub use crate::{PipelineConfig, ScoringPipeline};
    pub use crate::{AnomalyError, Result};
}
