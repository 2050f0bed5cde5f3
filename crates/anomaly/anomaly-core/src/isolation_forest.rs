//! Isolation Forest over a single variable.

use anomaly_api::IsolationForestConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyResult, DetectorKind, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::threshold::{below, contamination_offset};

const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Average path length of an unsuccessful search in a binary tree of `n`
/// points.
pub(crate) fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split { threshold: f64, left: usize, right: usize },
    Leaf { size: usize },
}

/// One isolation tree, stored as a node arena rooted at index 0.
#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(sample: &mut [f64], max_depth: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(sample, 0, max_depth, rng);
        tree
    }

    fn build(&mut self, sample: &mut [f64], depth: usize, max_depth: usize, rng: &mut StdRng) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: sample.len() });

        if depth >= max_depth || sample.len() <= 1 {
            return id;
        }
        let (min, max) = sample
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if min >= max {
            return id;
        }

        let threshold = rng.gen_range(min..max);
        let mut split = 0;
        for k in 0..sample.len() {
            if sample[k] <= threshold {
                sample.swap(k, split);
                split += 1;
            }
        }

        let (lower, upper) = sample.split_at_mut(split);
        let left = self.build(lower, depth + 1, max_depth, rng);
        let right = self.build(upper, depth + 1, max_depth, rng);
        self.nodes[id] = Node::Split {
            threshold,
            left,
            right,
        };
        id
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut node = 0;
        let mut depth = 0usize;
        loop {
            match self.nodes[node] {
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    node = if x <= threshold { left } else { right };
                    depth += 1;
                }
                Node::Leaf { size } => return depth as f64 + average_path_length(size),
            }
        }
    }
}

/// Isolation Forest detector.
///
/// Scores are `score_samples - offset`, where `score_samples` is the negated
/// anomaly score `-2^(-E[h(x)] / c(ψ))` and the offset is the
/// `contamination` quantile of the training scores. Negative scores are
/// flagged.
#[derive(Debug, Clone)]
pub struct IsolationForestDetector {
    config: IsolationForestConfig,
    trees: Vec<IsolationTree>,
    sample_size: usize,
    offset: f64,
    fitted: bool,
}

impl IsolationForestDetector {
    pub fn new(n_estimators: usize, max_samples: usize, contamination: f64) -> Result<Self> {
        Self::from_config(IsolationForestConfig::new(n_estimators, max_samples, contamination))
    }

    /// Create from configuration.
    pub fn from_config(config: IsolationForestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            trees: Vec::new(),
            sample_size: 0,
            offset: 0.0,
            fitted: false,
        })
    }

    /// Use a different RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Decision offset learned at fit time.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Sub-sample size each tree was grown on.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Negated anomaly score, in `[-1, 0)`; lower is more abnormal.
    pub fn score_samples(&self, data: &[f64]) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(AnomalyError::NotFitted);
        }
        let norm = average_path_length(self.sample_size).max(f64::MIN_POSITIVE);
        let n_trees = self.trees.len() as f64;
        Ok(data
            .iter()
            .map(|&x| {
                let mean_depth = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / n_trees;
                -(2.0f64).powf(-mean_depth / norm)
            })
            .collect())
    }
}

impl Default for IsolationForestDetector {
    fn default() -> Self {
        Self {
            config: IsolationForestConfig::default(),
            trees: Vec::new(),
            sample_size: 0,
            offset: 0.0,
            fitted: false,
        }
    }
}

impl AnomalyDetector for IsolationForestDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::IsolationForest
    }

    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.is_empty() {
            return Err(AnomalyError::InsufficientData {
                required: 1,
                got: 0,
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(AnomalyError::DetectionError(
                "non-finite value in training data".to_string(),
            ));
        }

        let sample_size = self.config.max_samples.min(data.len());
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        self.trees = (0..self.config.n_estimators)
            .map(|_| {
                let mut sample: Vec<f64> = index::sample(&mut rng, data.len(), sample_size)
                    .into_iter()
                    .map(|i| data[i])
                    .collect();
                IsolationTree::grow(&mut sample, max_depth, &mut rng)
            })
            .collect();
        self.sample_size = sample_size;

        let train_scores = self.score_samples(data)?;
        self.offset = contamination_offset(&train_scores, self.config.contamination)?;
        self.fitted = true;

        tracing::debug!(
            trees = self.trees.len(),
            sample_size,
            max_depth,
            offset = self.offset,
            "isolation forest fitted"
        );
        Ok(())
    }

    fn detect(&self, data: &[f64]) -> Result<AnomalyResult> {
        let scores = self.score(data)?;
        let is_anomaly = scores.iter().map(|&s| below(s, 0.0)).collect();
        Ok(AnomalyResult::new(is_anomaly, scores, 0.0))
    }

    fn score(&self, data: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(AnomalyError::NotFitted);
        }
        Ok(self
            .score_samples(data)?
            .into_iter()
            .map(|s| s - self.offset)
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
