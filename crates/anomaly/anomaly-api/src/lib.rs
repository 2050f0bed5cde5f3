//! Anomaly Detection API
//!
//! Parameter structs for every detector and the pipeline configuration that
//! bundles them. Defaults are the parameters the machine temperature reports
//! are produced with.

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use anomaly_spi::{AnomalyError, AnomalyResult, DetectorKind, Result, ScoreTable};

fn check_fraction(name: &str, value: f64, allow_one: bool) -> Result<()> {
    let upper_ok = if allow_one { value <= 1.0 } else { value < 1.0 };
    if value > 0.0 && upper_ok {
        Ok(())
    } else {
        let bound = if allow_one { "(0, 1]" } else { "(0, 1)" };
        Err(AnomalyError::invalid(name, format!("must be in {}, got {}", bound, value)))
    }
}

fn check_positive_count(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(AnomalyError::invalid(name, "must be at least 1"));
    }
    Ok(())
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Hotelling's T² configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotellingConfig {
    /// Chi-square confidence level for the critical value (default: 0.95).
    pub confidence: f64,
    /// Delta degrees of freedom of the standard deviation: 0 for the
    /// population form, 1 for the sample form (default: 0).
    pub ddof: usize,
}

impl Default for HotellingConfig {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            ddof: 0,
        }
    }
}

impl HotellingConfig {
    pub fn new(confidence: f64) -> Self {
        Self {
            confidence,
            ..Self::default()
        }
    }

    /// Same confidence, different standard deviation form.
    pub fn with_ddof(mut self, ddof: usize) -> Self {
        self.ddof = ddof;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("confidence", self.confidence, false)?;
        if self.ddof > 1 {
            return Err(AnomalyError::invalid("ddof", "must be 0 or 1"));
        }
        Ok(())
    }
}

/// One-Class SVM configuration (RBF kernel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneClassSvmConfig {
    /// Upper bound on the outlier fraction (default: 0.2).
    pub nu: f64,
    /// RBF kernel coefficient (default: 0.001).
    pub gamma: f64,
    /// Stopping tolerance on the KKT violation (default: 1e-3).
    pub tolerance: f64,
    /// Solver iteration cap (default: 10,000,000).
    pub max_iter: usize,
}

impl Default for OneClassSvmConfig {
    fn default() -> Self {
        Self {
            nu: 0.2,
            gamma: 0.001,
            tolerance: 1e-3,
            max_iter: 10_000_000,
        }
    }
}

impl OneClassSvmConfig {
    pub fn new(nu: f64, gamma: f64) -> Self {
        Self {
            nu,
            gamma,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("nu", self.nu, true)?;
        if !(self.gamma > 0.0) {
            return Err(AnomalyError::invalid("gamma", "must be positive"));
        }
        if !(self.tolerance > 0.0) {
            return Err(AnomalyError::invalid("tolerance", "must be positive"));
        }
        check_positive_count("max_iter", self.max_iter)
    }
}

/// Isolation Forest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationForestConfig {
    /// Number of trees (default: 300).
    pub n_estimators: usize,
    /// Sub-sample size per tree, clamped to the series length (default: 700).
    pub max_samples: usize,
    /// Expected outlier fraction, sets the decision offset (default: 0.1).
    pub contamination: f64,
    /// RNG seed (default: 42).
    pub seed: u64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_samples: 700,
            contamination: 0.1,
            seed: 42,
        }
    }
}

impl IsolationForestConfig {
    pub fn new(n_estimators: usize, max_samples: usize, contamination: f64) -> Self {
        Self {
            n_estimators,
            max_samples,
            contamination,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive_count("n_estimators", self.n_estimators)?;
        check_positive_count("max_samples", self.max_samples)?;
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnomalyError::invalid("contamination", "must be in (0, 0.5]"));
        }
        Ok(())
    }
}

/// Local Outlier Factor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LofConfig {
    /// Neighbourhood size, clamped to `n - 1` (default: 500).
    pub n_neighbors: usize,
    /// Expected outlier fraction, sets the decision offset (default: 0.07).
    pub contamination: f64,
}

impl Default for LofConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 500,
            contamination: 0.07,
        }
    }
}

impl LofConfig {
    pub fn new(n_neighbors: usize, contamination: f64) -> Self {
        Self {
            n_neighbors,
            contamination,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive_count("n_neighbors", self.n_neighbors)?;
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnomalyError::invalid("contamination", "must be in (0, 0.5]"));
        }
        Ok(())
    }
}

/// ChangeFinder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeFinderConfig {
    /// Discounting rate of the SDAR models (default: 0.002).
    pub r: f64,
    /// AR order (default: 1).
    pub order: usize,
    /// First-stage smoothing window, at least 3; the second stage uses half (default: 250).
    pub smooth: usize,
    /// Seed for the initial model state (default: 0).
    pub seed: u64,
    /// IQR multiplier of the post-hoc upper fence (default: 3.0).
    pub iqr_multiplier: f64,
}

impl Default for ChangeFinderConfig {
    fn default() -> Self {
        Self {
            r: 0.002,
            order: 1,
            smooth: 250,
            seed: 0,
            iqr_multiplier: 3.0,
        }
    }
}

impl ChangeFinderConfig {
    pub fn new(r: f64, order: usize, smooth: usize) -> Self {
        Self {
            r,
            order,
            smooth,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("r", self.r, false)?;
        check_positive_count("order", self.order)?;
        if self.smooth < 3 {
            return Err(AnomalyError::invalid("smooth", "must be at least 3"));
        }
        if !(self.iqr_multiplier >= 0.0) {
            return Err(AnomalyError::invalid("iqr_multiplier", "must be non-negative"));
        }
        Ok(())
    }
}

/// Variance band configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceBandConfig {
    /// Band half-width in standard deviations (default: 1.5).
    pub multiplier: f64,
}

impl Default for VarianceBandConfig {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl VarianceBandConfig {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.multiplier > 0.0) {
            return Err(AnomalyError::invalid("multiplier", "must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Pipeline Configuration
// ============================================================================

/// Parameters for every detector the pipeline may run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub hotelling: HotellingConfig,
    pub one_class_svm: OneClassSvmConfig,
    pub isolation_forest: IsolationForestConfig,
    pub lof: LofConfig,
    pub change_finder: ChangeFinderConfig,
    pub variance_band: VarianceBandConfig,
}

impl PipelineConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.hotelling.validate()?;
        self.one_class_svm.validate()?;
        self.isolation_forest.validate()?;
        self.lof.validate()?;
        self.change_finder.validate()?;
        self.variance_band.validate()
    }

    /// Parse from JSON; absent sections and fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnomalyError::invalid("pipeline config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
