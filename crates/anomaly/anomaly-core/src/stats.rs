//! Descriptive statistics shared by the detectors.

use anomaly_spi::{AnomalyError, Result};

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// `ddof = 0` is the population deviation, `ddof = 1` the sample deviation.
pub fn std_dev(data: &[f64], ddof: usize) -> Option<f64> {
    if data.len() <= ddof {
        return None;
    }
    let m = mean(data)?;
    let ss = data.iter().map(|x| (x - m).powi(2)).sum::<f64>();
    Some((ss / (data.len() - ddof) as f64).sqrt())
}

/// Mean and standard deviation, rejecting empty or constant input.
pub fn mean_std(data: &[f64], ddof: usize) -> Result<(f64, f64)> {
    let required = ddof.max(1) + 1;
    if data.len() < required {
        return Err(AnomalyError::InsufficientData {
            required,
            got: data.len(),
        });
    }
    let m = mean(data).unwrap_or(0.0);
    let s = std_dev(data, ddof).unwrap_or(0.0);
    if !m.is_finite() || !s.is_finite() {
        return Err(AnomalyError::DetectionError(
            "non-finite mean or standard deviation".to_string(),
        ));
    }
    if s == 0.0 {
        return Err(AnomalyError::DegenerateInput(
            "all values are identical".to_string(),
        ));
    }
    Ok((m, s))
}

/// Percentile `q` in `[0, 100]` with linear interpolation between ranks.
///
/// NaN values are ignored; `None` when nothing is left.
pub fn percentile(data: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    Some(percentile_sorted(&sorted, q))
}

/// Percentile of already sorted, non-empty data.
pub(crate) fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let q = q.clamp(0.0, 100.0);
    let pos = (sorted.len() - 1) as f64 * q / 100.0;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
