//! Per-method results over one series.

use serde::{Deserialize, Serialize};

use super::{AnomalyResult, DetectorKind};
use crate::error::{AnomalyError, Result};

/// Results of several detectors run over the same series.
///
/// Methods are kept independent: a row may be flagged by any subset of them
/// and no cross-method vote is taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    rows: usize,
    results: Vec<(DetectorKind, AnomalyResult)>,
}

impl ScoreTable {
    /// Create an empty table for a series of `rows` readings.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            results: Vec::new(),
        }
    }

    /// Number of rows every result covers.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Add or replace the result of one method.
    pub fn insert(&mut self, kind: DetectorKind, result: AnomalyResult) -> Result<()> {
        if result.scores.len() != self.rows || result.is_anomaly.len() != self.rows {
            return Err(AnomalyError::DetectionError(format!(
                "{} produced {} scores and {} flags for {} rows",
                kind,
                result.scores.len(),
                result.is_anomaly.len(),
                self.rows
            )));
        }
        match self.results.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = result,
            None => self.results.push((kind, result)),
        }
        Ok(())
    }

    /// Methods present, in insertion order.
    pub fn kinds(&self) -> Vec<DetectorKind> {
        self.results.iter().map(|(k, _)| *k).collect()
    }

    /// Iterate over `(kind, result)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DetectorKind, &AnomalyResult)> {
        self.results.iter().map(|(k, r)| (*k, r))
    }

    /// Result of one method.
    pub fn result(&self, kind: DetectorKind) -> Option<&AnomalyResult> {
        self.results.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }

    /// Score column of one method.
    pub fn scores(&self, kind: DetectorKind) -> Option<&[f64]> {
        self.result(kind).map(|r| r.scores.as_slice())
    }

    /// Flag column of one method.
    pub fn flags(&self, kind: DetectorKind) -> Option<&[bool]> {
        self.result(kind).map(|r| r.is_anomaly.as_slice())
    }

    /// Flagged row positions of one method; empty when the method is absent.
    pub fn flagged_indices(&self, kind: DetectorKind) -> Vec<usize> {
        self.result(kind)
            .map(AnomalyResult::anomaly_indices)
            .unwrap_or_default()
    }
}
