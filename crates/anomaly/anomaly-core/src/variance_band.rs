//! Mean ± k·σ band detector.

use anomaly_api::VarianceBandConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyResult, DetectorKind, Result};

use crate::stats::mean_std;
use crate::threshold::outside_band;

/// Flags values outside `mean ± multiplier * std` of the fitted series.
///
/// Uses the sample standard deviation. The score is the absolute deviation in
/// standard deviations and the reported threshold is the multiplier.
#[derive(Debug, Clone)]
pub struct VarianceBandDetector {
    multiplier: f64,
    mean: f64,
    std_dev: f64,
    fitted: bool,
}

impl VarianceBandDetector {
    pub fn new(multiplier: f64) -> Result<Self> {
        Self::from_config(VarianceBandConfig::new(multiplier))
    }

    /// Create from configuration.
    pub fn from_config(config: VarianceBandConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            multiplier: config.multiplier,
            mean: 0.0,
            std_dev: 1.0,
            fitted: false,
        })
    }

    /// Lower and upper band edges.
    pub fn band(&self) -> (f64, f64) {
        let half = self.multiplier * self.std_dev;
        (self.mean - half, self.mean + half)
    }
}

impl Default for VarianceBandDetector {
    fn default() -> Self {
        Self {
            multiplier: VarianceBandConfig::default().multiplier,
            mean: 0.0,
            std_dev: 1.0,
            fitted: false,
        }
    }
}

impl AnomalyDetector for VarianceBandDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::VarianceBand
    }

    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let (mean, std_dev) = mean_std(data, 1)?;
        self.mean = mean;
        self.std_dev = std_dev;
        self.fitted = true;
        Ok(())
    }

    fn detect(&self, data: &[f64]) -> Result<AnomalyResult> {
        let scores = self.score(data)?;
        let (lower, upper) = self.band();
        let is_anomaly = data.iter().map(|&v| outside_band(v, lower, upper)).collect();
        Ok(AnomalyResult::new(is_anomaly, scores, self.multiplier))
    }

    fn score(&self, data: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(AnomalyError::NotFitted);
        }
        Ok(data
            .iter()
            .map(|&v| (v - self.mean).abs() / self.std_dev)
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
