//! One-Class SVM with an RBF kernel.
//!
//! Solves the nu-parameterised one-class dual with sequential minimal
//! optimisation: the working pair is chosen with second-order information and
//! kernel rows are computed on demand, so memory stays linear in the series
//! length.

use anomaly_api::OneClassSvmConfig;
use anomaly_spi::{AnomalyDetector, AnomalyError, AnomalyResult, DetectorKind, Result};

use crate::threshold::non_positive;

/// Substitute for non-positive curvature in the pair update.
const TAU: f64 = 1e-12;

/// One-Class SVM detector.
///
/// The score is the signed decision function `Σ αᵢ k(xᵢ, x) - ρ`; values at or
/// below zero lie outside the learned support and are flagged.
#[derive(Debug, Clone)]
pub struct OneClassSvmDetector {
    config: OneClassSvmConfig,
    support: Vec<f64>,
    coefficients: Vec<f64>,
    rho: f64,
    fitted: bool,
}

impl OneClassSvmDetector {
    pub fn new(nu: f64, gamma: f64) -> Result<Self> {
        Self::from_config(OneClassSvmConfig::new(nu, gamma))
    }

    /// Create from configuration.
    pub fn from_config(config: OneClassSvmConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            support: Vec::new(),
            coefficients: Vec::new(),
            rho: 0.0,
            fitted: false,
        })
    }

    /// Offset of the decision function.
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Number of training values with a non-zero coefficient.
    pub fn support_count(&self) -> usize {
        self.support.len()
    }

    fn kernel(&self, a: f64, b: f64) -> f64 {
        (-self.config.gamma * (a - b).powi(2)).exp()
    }

    fn decision(&self, x: f64) -> f64 {
        self.support
            .iter()
            .zip(&self.coefficients)
            .map(|(&sv, &alpha)| alpha * self.kernel(sv, x))
            .sum::<f64>()
            - self.rho
    }
}

impl Default for OneClassSvmDetector {
    fn default() -> Self {
        Self {
            config: OneClassSvmConfig::default(),
            support: Vec::new(),
            coefficients: Vec::new(),
            rho: 0.0,
            fitted: false,
        }
    }
}

impl AnomalyDetector for OneClassSvmDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::OneClassSvm
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

        let solution = Solver::new(data, &self.config).solve();
        if !solution.converged {
            tracing::warn!(
                iterations = solution.iterations,
                max_iter = self.config.max_iter,
                "one-class SVM reached the iteration cap before convergence"
            );
        } else {
            tracing::debug!(iterations = solution.iterations, rho = solution.rho, "one-class SVM converged");
        }

        self.support.clear();
        self.coefficients.clear();
        for (&x, &alpha) in data.iter().zip(&solution.alpha) {
            if alpha > 0.0 {
                self.support.push(x);
                self.coefficients.push(alpha);
            }
        }
        self.rho = solution.rho;
        self.fitted = true;
        Ok(())
    }

    fn detect(&self, data: &[f64]) -> Result<AnomalyResult> {
        let scores = self.score(data)?;
        let is_anomaly = scores.iter().map(|&s| non_positive(s)).collect();
        Ok(AnomalyResult::new(is_anomaly, scores, 0.0))
    }

    fn score(&self, data: &[f64]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(AnomalyError::NotFitted);
        }
        let scores: Vec<f64> = data.iter().map(|&x| self.decision(x)).collect();
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(AnomalyError::DetectionError(
                "non-finite one-class SVM decision value".to_string(),
            ));
        }
        Ok(scores)
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

// ============================================================================
// SMO solver
// ============================================================================

struct Solution {
    alpha: Vec<f64>,
    rho: f64,
    iterations: usize,
    converged: bool,
}

/// Dual problem `min ½ αᵀQα` s.t. `0 ≤ αᵢ ≤ 1`, `Σ αᵢ = ν·l`.
struct Solver<'a> {
    x: &'a [f64],
    gamma: f64,
    tolerance: f64,
    max_iter: usize,
    alpha: Vec<f64>,
    gradient: Vec<f64>,
}

impl<'a> Solver<'a> {
    fn new(x: &'a [f64], config: &OneClassSvmConfig) -> Self {
        let l = x.len();
        let total = config.nu * l as f64;
        let full = (total.floor() as usize).min(l);

        let mut alpha = vec![0.0; l];
        for a in alpha.iter_mut().take(full) {
            *a = 1.0;
        }
        if full < l {
            alpha[full] = total - full as f64;
        }

        let mut solver = Self {
            x,
            gamma: config.gamma,
            tolerance: config.tolerance,
            max_iter: config.max_iter,
            alpha,
            gradient: vec![0.0; l],
        };
        solver.init_gradient();
        solver
    }

    fn kernel_row(&self, i: usize) -> Vec<f64> {
        let xi = self.x[i];
        self.x
            .iter()
            .map(|&xj| (-self.gamma * (xi - xj).powi(2)).exp())
            .collect()
    }

    fn init_gradient(&mut self) {
        for i in 0..self.x.len() {
            let alpha_i = self.alpha[i];
            if alpha_i > 0.0 {
                let row = self.kernel_row(i);
                for (g, q) in self.gradient.iter_mut().zip(&row) {
                    *g += alpha_i * q;
                }
            }
        }
    }

    fn is_upper(&self, i: usize) -> bool {
        self.alpha[i] >= 1.0
    }

    fn is_lower(&self, i: usize) -> bool {
        self.alpha[i] <= 0.0
    }

    /// Maximal violating pair with second-order selection of `j`.
    fn select_working_set(&self) -> Option<(usize, usize, Vec<f64>)> {
        let mut g_max = f64::NEG_INFINITY;
        let mut i_sel = None;
        for t in 0..self.x.len() {
            if !self.is_upper(t) && -self.gradient[t] >= g_max {
                g_max = -self.gradient[t];
                i_sel = Some(t);
            }
        }
        let i = i_sel?;
        let q_i = self.kernel_row(i);

        let mut g_max2 = f64::NEG_INFINITY;
        let mut j_sel = None;
        let mut obj_diff_min = f64::INFINITY;
        for j in 0..self.x.len() {
            if self.is_lower(j) {
                continue;
            }
            let g_j = self.gradient[j];
            if g_j >= g_max2 {
                g_max2 = g_j;
            }
            let grad_diff = g_max + g_j;
            if grad_diff > 0.0 {
                // Q_ii = Q_jj = 1 for the RBF kernel
                let quad = 2.0 - 2.0 * q_i[j];
                let quad = if quad > 0.0 { quad } else { TAU };
                let obj_diff = -(grad_diff * grad_diff) / quad;
                if obj_diff <= obj_diff_min {
                    obj_diff_min = obj_diff;
                    j_sel = Some(j);
                }
            }
        }

        if g_max + g_max2 < self.tolerance {
            return None;
        }
        j_sel.map(|j| (i, j, q_i))
    }

    fn update_pair(&mut self, i: usize, j: usize, q_i: &[f64]) {
        let q_j = self.kernel_row(j);
        let old_i = self.alpha[i];
        let old_j = self.alpha[j];

        let quad = 2.0 - 2.0 * q_i[j];
        let quad = if quad > 0.0 { quad } else { TAU };
        let delta = (self.gradient[i] - self.gradient[j]) / quad;
        let sum = old_i + old_j;
        let mut a_i = old_i - delta;
        let mut a_j = old_j + delta;

        if sum > 1.0 {
            if a_i > 1.0 {
                a_i = 1.0;
                a_j = sum - 1.0;
            }
        } else if a_j < 0.0 {
            a_j = 0.0;
            a_i = sum;
        }
        if sum > 1.0 {
            if a_j > 1.0 {
                a_j = 1.0;
                a_i = sum - 1.0;
            }
        } else if a_i < 0.0 {
            a_i = 0.0;
            a_j = sum;
        }

        self.alpha[i] = a_i;
        self.alpha[j] = a_j;

        let d_i = a_i - old_i;
        let d_j = a_j - old_j;
        for (k, g) in self.gradient.iter_mut().enumerate() {
            *g += q_i[k] * d_i + q_j[k] * d_j;
        }
    }

    fn rho(&self) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_count = 0usize;
        let mut free_sum = 0.0;

        for (t, &g) in self.gradient.iter().enumerate() {
            if self.is_upper(t) {
                lower = lower.max(g);
            } else if self.is_lower(t) {
                upper = upper.min(g);
            } else {
                free_count += 1;
                free_sum += g;
            }
        }

        if free_count > 0 {
            free_sum / free_count as f64
        } else {
            (upper + lower) / 2.0
        }
    }

    fn solve(mut self) -> Solution {
        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iter {
            match self.select_working_set() {
                Some((i, j, q_i)) => self.update_pair(i, j, &q_i),
                None => {
                    converged = true;
                    break;
                }
            }
            iterations += 1;
        }

        let rho = self.rho();
        Solution {
            alpha: self.alpha,
            rho,
            iterations,
            converged,
        }
    }
}
