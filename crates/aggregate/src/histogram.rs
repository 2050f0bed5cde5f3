//! Equal-width histograms.

use serde::{Deserialize, Serialize};

use crate::error::{AggregateError, Result};
use crate::linspace;

/// Bin count of the score histograms.
pub const DEFAULT_BINS: usize = 50;

/// Bin edges and counts. `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total count over all bins.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(label, count)` per bin, labelled by the bin's left edge.
    pub fn bars(&self) -> Vec<(String, u64)> {
        self.edges
            .iter()
            .zip(&self.counts)
            .map(|(edge, &count)| (edge.to_string(), count))
            .collect()
    }
}

/// Histogram of `values` over `bins` equal-width bins spanning their range.
///
/// Every bin is half-open except the last, which includes the maximum.
/// Non-finite values are skipped. When all values are equal the range is
/// widened by 0.5 on each side.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(AggregateError::InvalidParameter {
            name: "bins".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let (mut lo, mut hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let edges = linspace(lo, hi, bins + 1);
    let norm = bins as f64 / (hi - lo);
    let mut counts = vec![0u64; bins];
    for v in finite {
        let mut i = (((v - lo) * norm) as usize).min(bins - 1);
        // the computed index can be off by one next to an edge
        if v < edges[i] {
            i -= 1;
        } else if i + 1 < bins && v >= edges[i + 1] {
            i += 1;
        }
        counts[i] += 1;
    }

    Ok(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_input_length() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 * 0.37 - 5.0).collect();
        let h = histogram(&values, DEFAULT_BINS).unwrap();
        assert_eq!(h.bins(), 50);
        assert_eq!(h.edges.len(), 51);
        assert_eq!(h.total(), 1000);
    }

    #[test]
    fn test_last_bin_closed() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_constant_values_widen_range() {
        let h = histogram(&[3.0, 3.0, 3.0], 2).unwrap();
        assert_eq!(h.edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(h.counts, vec![0, 3]);
    }

    #[test]
    fn test_nan_ignored() {
        let h = histogram(&[1.0, f64::NAN, 2.0], 2).unwrap();
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn test_bars_labelled_by_left_edge() {
        let h = histogram(&[0.0, 0.5, 1.0], 2).unwrap();
        let bars = h.bars();
        assert_eq!(bars[0], ("0".to_string(), 1));
        assert_eq!(bars[1], ("0.5".to_string(), 2));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(histogram(&[], 10), Err(AggregateError::EmptyInput)));
        assert!(matches!(
            histogram(&[1.0], 0),
            Err(AggregateError::InvalidParameter { .. })
        ));
    }
}
