//! Anomaly Detection Core
//!
//! Detector implementations, threshold rules, and the scoring pipeline.

mod change_finder;
mod hotelling;
mod isolation_forest;
mod lof;
mod one_class_svm;
mod pipeline;
pub mod stats;
pub mod threshold;
mod variance_band;

pub use change_finder::{ChangeFinder, ChangeFinderDetector};
pub use hotelling::HotellingDetector;
pub use isolation_forest::IsolationForestDetector;
pub use lof::LofDetector;
pub use one_class_svm::OneClassSvmDetector;
pub use pipeline::{detector_for, ScoringPipeline};
pub use variance_band::VarianceBandDetector;
