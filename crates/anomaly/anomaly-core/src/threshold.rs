//! Threshold rules.
//!
//! Builders derive a scalar threshold from the current run's data; predicates
//! turn one score and that threshold into a flag. Nothing is carried between
//! runs.

use anomaly_spi::{AnomalyError, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::stats::percentile;

/// `score > threshold`.
pub fn exceeds(score: f64, threshold: f64) -> bool {
    score > threshold
}

/// `score < offset`.
pub fn below(score: f64, offset: f64) -> bool {
    score < offset
}

/// `score <= 0`, the inlier/outlier boundary of a signed decision function.
pub fn non_positive(score: f64) -> bool {
    score <= 0.0
}

/// Value strictly outside `[lower, upper]`.
pub fn outside_band(value: f64, lower: f64, upper: f64) -> bool {
    value < lower || value > upper
}

/// Chi-square quantile at `confidence` with `degrees_of_freedom`.
pub fn chi_square_critical(confidence: f64, degrees_of_freedom: f64) -> Result<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(AnomalyError::invalid("confidence", "must be in (0, 1)"));
    }
    let dist = ChiSquared::new(degrees_of_freedom)
        .map_err(|e| AnomalyError::invalid("degrees_of_freedom", e.to_string()))?;
    Ok(dist.inverse_cdf(confidence))
}

/// Upper Tukey fence `Q3 + multiplier * (Q3 - Q1)` of the scores.
pub fn iqr_upper_fence(scores: &[f64], multiplier: f64) -> Result<f64> {
    let q1 = percentile(scores, 25.0);
    let q3 = percentile(scores, 75.0);
    match (q1, q3) {
        (Some(q1), Some(q3)) => Ok(q3 + (q3 - q1) * multiplier),
        _ => Err(AnomalyError::InsufficientData {
            required: 1,
            got: 0,
        }),
    }
}

/// Score at the `contamination` quantile; scores below it are outliers.
pub fn contamination_offset(scores: &[f64], contamination: f64) -> Result<f64> {
    percentile(scores, 100.0 * contamination).ok_or(AnomalyError::InsufficientData {
        required: 1,
        got: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(exceeds(3.85, 3.84));
        assert!(!exceeds(3.84, 3.84));
        assert!(below(-0.1, 0.0));
        assert!(!below(0.0, 0.0));
        assert!(non_positive(0.0));
        assert!(!non_positive(1e-9));
        assert!(outside_band(10.1, 0.0, 10.0));
        assert!(outside_band(-0.1, 0.0, 10.0));
        assert!(!outside_band(10.0, 0.0, 10.0));
    }

    #[test]
    fn test_chi_square_critical_one_dof() {
        let crit = chi_square_critical(0.95, 1.0).unwrap();
        assert!((crit - 3.841_458_820_694_124).abs() < 1e-6, "got {crit}");
    }

    #[test]
    fn test_chi_square_rejects_bad_confidence() {
        assert!(chi_square_critical(1.0, 1.0).is_err());
        assert!(chi_square_critical(0.95, 0.0).is_err());
    }

    #[test]
    fn test_iqr_upper_fence() {
        let scores = [1.0, 2.0, 3.0, 4.0];
        // Q1 = 1.75, Q3 = 3.25
        let fence = iqr_upper_fence(&scores, 3.0).unwrap();
        assert!((fence - 7.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_scores() {
        assert!(iqr_upper_fence(&[], 3.0).is_err());
        assert!(contamination_offset(&[], 0.1).is_err());
    }

    #[test]
    fn test_contamination_offset() {
        let scores: Vec<f64> = (0..11).map(|i| i as f64).collect();
        assert!((contamination_offset(&scores, 0.1).unwrap() - 1.0).abs() < 1e-12);
    }
}
