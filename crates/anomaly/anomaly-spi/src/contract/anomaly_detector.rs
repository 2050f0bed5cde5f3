//! Anomaly detector trait definition.

use crate::error::Result;
use crate::model::{AnomalyResult, DetectorKind};

/// Anomaly detector trait.
///
/// Implementations are fitted on a series and then score or flag values.
/// The scoring pipeline always fits and detects on the same series, which
/// makes every detector a pure function of that series.
pub trait AnomalyDetector {
    /// Which method this detector implements.
    fn kind(&self) -> DetectorKind;

    /// Fit the detector to training data.
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Detect anomalies in data.
    fn detect(&self, data: &[f64]) -> Result<AnomalyResult>;

    /// Compute anomaly scores without thresholding.
    fn score(&self, data: &[f64]) -> Result<Vec<f64>>;

    /// Check if detector has been fitted.
    fn is_fitted(&self) -> bool;

    /// Fit on `data` and detect on the same values.
    fn fit_detect(&mut self, data: &[f64]) -> Result<AnomalyResult> {
        self.fit(data)?;
        self.detect(data)
    }
}
