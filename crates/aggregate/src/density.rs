//! Gaussian kernel density estimates on a shared grid.

use std::f64::consts::PI;

use data_spi::Series;
use serde::{Deserialize, Serialize};

use crate::error::{AggregateError, Result};
use crate::group::{CalendarKey, GroupKey};

/// `points` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            let mut out: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
            out[points - 1] = end;
            out
        }
    }
}

/// Univariate Gaussian KDE with Scott's bandwidth rule.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    variance: f64,
}

impl GaussianKde {
    /// Fit on `samples`; needs at least two distinct finite values.
    pub fn fit(samples: &[f64]) -> Result<Self> {
        Self::fit_group("all", samples)
    }

    fn fit_group(group: &str, samples: &[f64]) -> Result<Self> {
        let samples: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        let n = samples.len();
        let insufficient = || AggregateError::InsufficientData {
            group: group.to_string(),
            required: 2,
            got: n.min(1),
        };
        if n < 2 {
            return Err(insufficient());
        }

        let mean = samples.iter().sum::<f64>() / n as f64;
        let data_variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        if data_variance <= 0.0 {
            return Err(insufficient());
        }

        let factor = (n as f64).powf(-0.2);
        Ok(Self {
            samples,
            variance: data_variance * factor * factor,
        })
    }

    /// Kernel bandwidth (standard deviation of each kernel).
    pub fn bandwidth(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Density at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = (2.0 * PI * self.variance).sqrt() * self.samples.len() as f64;
        self.samples
            .iter()
            .map(|&s| (-(x - s).powi(2) / (2.0 * self.variance)).exp())
            .sum::<f64>()
            / norm
    }

    /// Density at every point of `xs`.
    pub fn evaluate_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// What to do with a group that cannot be estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyGroupPolicy {
    /// Fail with [`AggregateError::InsufficientData`] naming the group.
    #[default]
    Abort,
    /// Leave the group out and log a warning.
    Skip,
}

/// One named density curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub name: String,
    pub density: Vec<f64>,
}

/// Density curves evaluated on one shared x grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityGrid {
    pub x: Vec<f64>,
    pub curves: Vec<DensityCurve>,
}

impl DensityGrid {
    /// Curve by name.
    pub fn curve(&self, name: &str) -> Option<&DensityCurve> {
        self.curves.iter().find(|c| c.name == name)
    }
}

fn grid_over(values: &[f64], points: usize) -> Result<Vec<f64>> {
    if points < 2 {
        return Err(AggregateError::InvalidParameter {
            name: "points".to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return Err(AggregateError::EmptyInput);
    }
    Ok(linspace(lo, hi, points))
}

/// Density of `values` over `points` grid values spanning their range.
pub fn density_over_range(values: &[f64], points: usize) -> Result<DensityGrid> {
    let x = grid_over(values, points)?;
    let kde = GaussianKde::fit(values)?;
    let density = kde.evaluate_all(&x);
    Ok(DensityGrid {
        x,
        curves: vec![DensityCurve {
            name: "all".to_string(),
            density,
        }],
    })
}

/// One density curve per calendar group, all on the grid of the whole series.
///
/// Groups appear in order of their first reading.
pub fn density_by(
    series: &Series,
    key: CalendarKey,
    points: usize,
    policy: EmptyGroupPolicy,
) -> Result<DensityGrid> {
    let values = series.values();
    let x = grid_over(&values, points)?;

    let mut groups: Vec<(GroupKey, Vec<f64>)> = Vec::new();
    for reading in series {
        let k = key.key_of(reading);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(reading.value),
            None => groups.push((k, vec![reading.value])),
        }
    }

    let mut curves = Vec::with_capacity(groups.len());
    for (group, members) in groups {
        let name = group.to_string();
        match GaussianKde::fit_group(&name, &members) {
            Ok(kde) => curves.push(DensityCurve {
                density: kde.evaluate_all(&x),
                name,
            }),
            Err(err) if policy == EmptyGroupPolicy::Skip => {
                tracing::warn!(group = %name, error = %err, "skipping density group");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(DensityGrid { x, curves })
}
