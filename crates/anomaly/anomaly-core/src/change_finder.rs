//! ChangeFinder: two-stage sequentially discounting AR scoring.
//!
//! The first stage fits a discounting AR model to the raw values and scores
//! each one by its negative log-likelihood. Those scores are smoothed, fed to a
//! second AR model, and its scores are smoothed again to give the change
//! score. Both stages start from a seeded random state.

use std::collections::VecDeque;
use std::f64::consts::PI;

use anomaly_api::ChangeFinderConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyResult, DetectorKind, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::threshold::{exceeds, iqr_upper_fence};

/// AR coefficients (leading `1`) and final prediction error for the
/// autocovariances `r[0..=order]`.
fn levinson_durbin(r: &[f64], order: usize) -> (Vec<f64>, f64) {
    let mut a = vec![0.0; order + 1];
    let mut e = vec![0.0; order + 1];
    a[0] = 1.0;
    a[1] = -r[1] / r[0];
    e[1] = r[0] + r[1] * a[1];

    for k in 1..order {
        let mut lambda = 0.0;
        for j in 0..=k {
            lambda -= a[j] * r[k + 1 - j];
        }
        lambda /= e[k];

        let mut next = vec![0.0; order + 1];
        next[..=k].copy_from_slice(&a[..=k]);
        for i in 0..=k + 1 {
            let v = if i == 0 { 0.0 } else if i == k + 1 { 1.0 } else { a[k + 1 - i] };
            next[i] += lambda * v;
        }
        a = next;
        e[k + 1] = e[k] * (1.0 - lambda * lambda);
    }
    (a, e[order])
}

/// One-dimensional sequentially discounting AR model.
#[derive(Debug, Clone)]
struct Sdar {
    r: f64,
    order: usize,
    mu: f64,
    sigma: f64,
    c: Vec<f64>,
}

impl Sdar {
    fn new(r: f64, order: usize, rng: &mut StdRng) -> Self {
        let mu = rng.gen::<f64>();
        let sigma = rng.gen::<f64>();
        Self {
            r,
            order,
            mu,
            sigma,
            c: vec![0.0; order + 1],
        }
    }

    /// Learn from `x` given the previous `order` values (oldest first) and
    /// return its negative log-likelihood under the model before the variance
    /// update.
    fn update(&mut self, x: f64, term: &VecDeque<f64>) -> f64 {
        let r = self.r;
        self.mu = (1.0 - r) * self.mu + r * x;
        for i in 1..=self.order {
            let lagged = term[term.len() - i];
            self.c[i] = (1.0 - r) * self.c[i] + r * (x - self.mu) * (lagged - self.mu);
        }
        self.c[0] = (1.0 - r) * self.c[0] + r * (x - self.mu) * (x - self.mu);

        let (a, _) = levinson_durbin(&self.c, self.order);
        let xhat = term
            .iter()
            .rev()
            .zip(&a[1..])
            .map(|(&t, &coef)| -coef * (t - self.mu))
            .sum::<f64>()
            + self.mu;

        self.sigma = (1.0 - r) * self.sigma + r * (x - xhat) * (x - xhat);
        0.5 * (x - xhat).powi(2) / self.sigma + 0.5 * (2.0 * PI * self.sigma).ln()
    }
}

fn push_bounded(buffer: &mut VecDeque<f64>, value: f64, size: usize) {
    buffer.push_back(value);
    if buffer.len() > size {
        buffer.pop_front();
    }
}

fn average(buffer: &VecDeque<f64>) -> f64 {
    buffer.iter().sum::<f64>() / buffer.len() as f64
}

/// Online ChangeFinder model.
///
/// Returns `0.0` until both smoothing windows are full.
#[derive(Debug, Clone)]
pub struct ChangeFinder {
    order: usize,
    smooth: usize,
    smooth2: usize,
    ts: VecDeque<f64>,
    first_scores: VecDeque<f64>,
    smoothed_scores: VecDeque<f64>,
    second_scores: VecDeque<f64>,
    first: Sdar,
    second: Sdar,
}

impl ChangeFinder {
    /// Create a model with fresh, seeded state.
    pub fn new(config: &ChangeFinderConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let first = Sdar::new(config.r, config.order, &mut rng);
        let second = Sdar::new(config.r, config.order, &mut rng);
        Ok(Self {
            order: config.order,
            smooth: config.smooth,
            smooth2: half_window(config.smooth),
            ts: VecDeque::with_capacity(config.order + 1),
            first_scores: VecDeque::with_capacity(config.smooth + 1),
            smoothed_scores: VecDeque::with_capacity(config.order + 1),
            second_scores: VecDeque::new(),
            first,
            second,
        })
    }

    /// Length of the second smoothing window.
    pub fn second_window(&self) -> usize {
        self.smooth2
    }

    /// Feed one value and return the current change score.
    pub fn update(&mut self, x: f64) -> Result<f64> {
        if !x.is_finite() {
            return Err(AnomalyError::DetectionError(format!("non-finite input {}", x)));
        }

        if self.ts.len() == self.order {
            let score = self.first.update(x, &self.ts);
            push_bounded(&mut self.first_scores, score, self.smooth);
        }
        push_bounded(&mut self.ts, x, self.order);

        let second_target = (self.first_scores.len() == self.smooth).then(|| average(&self.first_scores));
        if let Some(target) = second_target {
            if self.smoothed_scores.len() == self.order {
                let score = self.second.update(target, &self.smoothed_scores);
                push_bounded(&mut self.second_scores, score, self.smooth2);
            }
            push_bounded(&mut self.smoothed_scores, target, self.order);
        }

        if self.second_scores.len() == self.smooth2 {
            let score = average(&self.second_scores);
            if !score.is_finite() {
                return Err(AnomalyError::DetectionError(
                    "non-finite ChangeFinder score".to_string(),
                ));
            }
            Ok(score)
        } else {
            Ok(0.0)
        }
    }
}

/// Half the first window, ties rounded to even.
fn half_window(smooth: usize) -> usize {
    ((smooth as f64 / 2.0).round_ties_even() as usize).max(1)
}

/// ChangeFinder as a batch detector.
///
/// Fitting runs a fresh online model over the series; values whose score
/// exceeds `Q3 + iqr_multiplier * IQR` of that run are flagged.
#[derive(Debug, Clone)]
pub struct ChangeFinderDetector {
    config: ChangeFinderConfig,
    train: Vec<f64>,
    training_scores: Vec<f64>,
    threshold: f64,
    fitted: bool,
}

impl ChangeFinderDetector {
    pub fn new(r: f64, order: usize, smooth: usize) -> Result<Self> {
        Self::from_config(ChangeFinderConfig::new(r, order, smooth))
    }

    /// Create from configuration.
    pub fn from_config(config: ChangeFinderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            train: Vec::new(),
            training_scores: Vec::new(),
            threshold: 0.0,
            fitted: false,
        })
    }

    /// Upper fence learned at fit time.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn run(&self, data: &[f64]) -> Result<Vec<f64>> {
        let mut model = ChangeFinder::new(&self.config)?;
        data.iter().map(|&x| model.update(x)).collect()
    }
}

impl Default for ChangeFinderDetector {
    fn default() -> Self {
        Self {
            config: ChangeFinderConfig::default(),
            train: Vec::new(),
            training_scores: Vec::new(),
            threshold: 0.0,
            fitted: false,
        }
    }
}

impl AnomalyDetector for ChangeFinderDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::ChangeFinder
    }

    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.is_empty() {
            return Err(AnomalyError::InsufficientData {
                required: 1,
                got: 0,
            });
        }
        let scores = self.run(data)?;
        self.threshold = iqr_upper_fence(&scores, self.config.iqr_multiplier)?;
        self.training_scores = scores;
        self.train = data.to_vec();
        self.fitted = true;

        tracing::debug!(threshold = self.threshold, "ChangeFinder fitted");
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
        if data == self.train.as_slice() {
            return Ok(self.training_scores.clone());
        }
        self.run(data)
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
