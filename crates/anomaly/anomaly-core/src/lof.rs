//! Local Outlier Factor over a single variable.
//!
//! Neighbourhoods are found on the sorted training values by expanding two
//! pointers outwards, so no neighbour lists are stored.

use anomaly_api::LofConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyResult, DetectorKind, Result};

use crate::threshold::{below, contamination_offset};

const LRD_EPSILON: f64 = 1e-10;

/// Collect the `k` sorted positions closest to `x`, walking down from
/// `left - 1` and up from `right`. Distances come out non-decreasing.
fn nearest(sorted: &[f64], x: f64, mut left: usize, mut right: usize, k: usize, out: &mut Vec<usize>) {
    out.clear();
    while out.len() < k {
        let down = (left > 0).then(|| x - sorted[left - 1]);
        let up = (right < sorted.len()).then(|| sorted[right] - x);
        match (down, up) {
            (Some(d), Some(u)) if d <= u => {
                left -= 1;
                out.push(left);
            }
            (_, Some(_)) => {
                out.push(right);
                right += 1;
            }
            (Some(_), None) => {
                left -= 1;
                out.push(left);
            }
            (None, None) => break,
        }
    }
}

/// Local Outlier Factor detector.
///
/// The score is the negative outlier factor: close to `-1` for inliers and
/// much lower for outliers. Values below the `contamination` quantile of the
/// training scores are flagged.
#[derive(Debug, Clone)]
pub struct LofDetector {
    config: LofConfig,
    k: usize,
    train: Vec<f64>,
    sorted: Vec<f64>,
    k_distance: Vec<f64>,
    lrd: Vec<f64>,
    training_scores: Vec<f64>,
    offset: f64,
    fitted: bool,
}

impl LofDetector {
    pub fn new(n_neighbors: usize, contamination: f64) -> Result<Self> {
        Self::from_config(LofConfig::new(n_neighbors, contamination))
    }

    /// Create from configuration.
    pub fn from_config(config: LofConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Effective neighbourhood size after clamping to the training size.
    pub fn n_neighbors(&self) -> usize {
        self.k
    }

    /// Decision offset learned at fit time.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn reach_density(&self, x: f64, neighbours: &[usize]) -> f64 {
        let reach: f64 = neighbours
            .iter()
            .map(|&o| self.k_distance[o].max((x - self.sorted[o]).abs()))
            .sum();
        1.0 / (reach / neighbours.len() as f64 + LRD_EPSILON)
    }

    fn mean_lrd(&self, neighbours: &[usize]) -> f64 {
        neighbours.iter().map(|&o| self.lrd[o]).sum::<f64>() / neighbours.len() as f64
    }

    /// Negative outlier factor of unseen values against the training set.
    fn query_scores(&self, data: &[f64]) -> Vec<f64> {
        let mut neighbours = Vec::with_capacity(self.k);
        data.iter()
            .map(|&x| {
                let pos = self.sorted.partition_point(|&v| v < x);
                nearest(&self.sorted, x, pos, pos, self.k, &mut neighbours);
                -self.mean_lrd(&neighbours) / self.reach_density(x, &neighbours)
            })
            .collect()
    }
}

impl Default for LofDetector {
    fn default() -> Self {
        Self {
            config: LofConfig::default(),
            k: 0,
            train: Vec::new(),
            sorted: Vec::new(),
            k_distance: Vec::new(),
            lrd: Vec::new(),
            training_scores: Vec::new(),
            offset: 0.0,
            fitted: false,
        }
    }
}

impl AnomalyDetector for LofDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::LocalOutlierFactor
    }

    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.len() < 2 {
            return Err(AnomalyError::InsufficientData {
                required: 2,
                got: data.len(),
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(AnomalyError::DetectionError(
                "non-finite value in training data".to_string(),
            ));
        }

        let n = data.len();
        let k = self.config.n_neighbors.min(n - 1);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));
        self.sorted = order.iter().map(|&i| data[i]).collect();
        self.k = k;

        let mut neighbours = Vec::with_capacity(k);

        self.k_distance = (0..n)
            .map(|p| {
                let x = self.sorted[p];
                nearest(&self.sorted, x, p, p + 1, k, &mut neighbours);
                neighbours
                    .last()
                    .map(|&o| (x - self.sorted[o]).abs())
                    .unwrap_or(0.0)
            })
            .collect();

        let lrd: Vec<f64> = (0..n)
            .map(|p| {
                let x = self.sorted[p];
                nearest(&self.sorted, x, p, p + 1, k, &mut neighbours);
                self.reach_density(x, &neighbours)
            })
            .collect();
        self.lrd = lrd;

        let mut scores = vec![0.0; n];
        for p in 0..n {
            let x = self.sorted[p];
            nearest(&self.sorted, x, p, p + 1, k, &mut neighbours);
            scores[order[p]] = -self.mean_lrd(&neighbours) / self.lrd[p];
        }

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(AnomalyError::DetectionError(
                "non-finite local outlier factor".to_string(),
            ));
        }
        self.offset = contamination_offset(&scores, self.config.contamination)?;
        self.training_scores = scores;
        self.train = data.to_vec();
        self.fitted = true;

        tracing::debug!(n_neighbors = k, offset = self.offset, "local outlier factor fitted");
        Ok(())
    }

    fn detect(&self, data: &[f64]) -> Result<AnomalyResult> {
        let scores = self.score(data)?;
        let is_anomaly = scores.iter().map(|&s| below(s, self.offset)).collect();
        Ok(AnomalyResult::new(is_anomaly, scores, self.offset))
    }

    fn score(&self, data: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(AnomalyError::NotFitted);
        }
        if data == self.train.as_slice() {
            return Ok(self.training_scores.clone());
        }
        Ok(self.query_scores(data))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_expands_both_ways() {
        let sorted = [1.0, 2.0, 4.0, 7.0, 11.0];
        let mut out = Vec::new();
        nearest(&sorted, 4.0, 2, 3, 3, &mut out);
        // ties go to the lower value
        assert_eq!(out, vec![1, 0, 3]);

        nearest(&sorted, 11.0, 4, 5, 10, &mut out);
        assert_eq!(out, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_isolated_point_lowest_score() {
        let mut data: Vec<f64> = (0..30).map(|i| 20.0 + (i % 6) as f64 * 0.2).collect();
        data.push(35.0);
        let mut detector = LofDetector::new(5, 0.05).unwrap();
        let result = detector.fit_detect(&data).unwrap();

        let outlier = result.scores[30];
        assert!(result.scores[..30].iter().all(|&s| s > outlier));
        assert!(result.is_anomaly[30]);
        assert!(outlier < -1.5);
    }

    #[test]
    fn test_neighbors_clamped() {
        let data = [1.0, 2.0, 3.5, 3.0];
        let mut detector = LofDetector::default();
        detector.fit(&data).unwrap();
        assert_eq!(detector.n_neighbors(), 3);
    }

    #[test]
    fn test_uniform_spacing_scores_near_one() {
        let data: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let mut detector = LofDetector::new(4, 0.1).unwrap();
        detector.fit(&data).unwrap();
        let scores = detector.score(&data).unwrap();
        for s in &scores[6..44] {
            assert!((s + 1.0).abs() < 1e-6, "got {s}");
        }
    }

    #[test]
    fn test_query_far_value_scores_low() {
        let data: Vec<f64> = (0..40).map(|i| (i % 8) as f64).collect();
        let mut detector = LofDetector::new(6, 0.1).unwrap();
        detector.fit(&data).unwrap();
        let scores = detector.score(&[3.5, 100.0]).unwrap();
        assert!(scores[1] < scores[0]);
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            LofDetector::default().fit(&[1.0]),
            Err(AnomalyError::InsufficientData { required: 2, got: 1 })
        ));
    }
}
