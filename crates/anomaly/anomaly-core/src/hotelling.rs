//! Hotelling's T² detector for a single variable.

use anomaly_api::HotellingConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyResult, DetectorKind, Result};

use crate::stats::mean_std;
use crate::threshold::{chi_square_critical, exceeds};

/// Hotelling's T² detector.
///
/// Scores each value by its squared standardized deviation
/// `((v - mean) / std)²` and flags scores above the chi-square critical value
/// with one degree of freedom. The standard deviation is the population one
/// unless the configuration asks for the sample form (`ddof = 1`).
#[derive(Debug, Clone)]
pub struct HotellingDetector {
    confidence: f64,
    ddof: usize,
    threshold: f64,
    mean: f64,
    std_dev: f64,
    fitted: bool,
}

impl HotellingDetector {
    /// Create a detector with the given chi-square confidence level.
    pub fn new(confidence: f64) -> Result<Self> {
        Self::from_config(HotellingConfig::new(confidence))
    }

    /// Create from configuration.
    pub fn from_config(config: HotellingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            confidence: config.confidence,
            ddof: config.ddof,
            threshold: chi_square_critical(config.confidence, 1.0)?,
            mean: 0.0,
            std_dev: 1.0,
            fitted: false,
        })
    }

    /// Confidence level.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Chi-square critical value the scores are compared against.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Delta degrees of freedom of the fitted standard deviation.
    pub fn ddof(&self) -> usize {
        self.ddof
    }

    /// Fitted mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Fitted standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl Default for HotellingDetector {
    fn default() -> Self {
        let config = HotellingConfig::default();
        Self {
            confidence: config.confidence,
            ddof: config.ddof,
            // chi2(1) at 0.95
            threshold: 3.841_458_820_694_124,
            mean: 0.0,
            std_dev: 1.0,
            fitted: false,
        }
    }
}

impl AnomalyDetector for HotellingDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Hotelling
    }

    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let (mean, std_dev) = mean_std(data, self.ddof)?;
        self.mean = mean;
        self.std_dev = std_dev;
        self.fitted = true;
        Ok(())
    }

    fn detect(&self, data: &[f64]) -> Result<AnomalyResult> {
        let scores = self.score(data)?;
        let is_anomaly = scores.iter().map(|&s| exceeds(s, self.threshold)).collect();
        Ok(AnomalyResult::new(is_anomaly, scores, self.threshold))
    }

    fn score(&self, data: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(AnomalyError::NotFitted);
        }
        Ok(data
            .iter()
            .map(|&x| ((x - self.mean) / self.std_dev).powi(2))
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
