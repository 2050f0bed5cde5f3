//! Readings joined with their per-method scores.

use std::collections::BTreeMap;

use anomaly_facade::{DetectorKind, ScoreTable};
use data_facade::{Reading, Series};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// A reading with the score and flag of every method that ran.
///
/// Methods are never combined: each flag stands on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReading {
    pub reading: Reading,
    pub scores: BTreeMap<DetectorKind, f64>,
    pub flags: BTreeMap<DetectorKind, bool>,
}

impl ScoredReading {
    pub fn score(&self, kind: DetectorKind) -> Option<f64> {
        self.scores.get(&kind).copied()
    }

    pub fn is_flagged(&self, kind: DetectorKind) -> bool {
        self.flags.get(&kind).copied().unwrap_or(false)
    }

    /// Methods that flagged this reading.
    pub fn flagged_by(&self) -> Vec<DetectorKind> {
        self.flags
            .iter()
            .filter_map(|(&kind, &flag)| flag.then_some(kind))
            .collect()
    }
}

/// Attach each row of `table` to the reading at the same position.
pub fn join(series: &Series, table: &ScoreTable) -> Result<Vec<ScoredReading>> {
    if series.len() != table.rows() {
        return Err(DashboardError::LengthMismatch {
            series: "scored readings".to_string(),
            x: series.len(),
            y: table.rows(),
        });
    }

    let scored = series
        .iter()
        .enumerate()
        .map(|(i, reading)| {
            let mut scores = BTreeMap::new();
            let mut flags = BTreeMap::new();
            for (kind, result) in table.iter() {
                scores.insert(kind, result.scores[i]);
                flags.insert(kind, result.is_anomaly[i]);
            }
            ScoredReading {
                reading: *reading,
                scores,
                flags,
            }
        })
        .collect();
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anomaly_facade::AnomalyResult;
    use chrono::NaiveDate;

    fn series(n: usize) -> Series {
        let start = NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Series::new(
            (0..n)
                .map(|i| Reading::new(start + chrono::Duration::minutes(5 * i as i64), i as f64))
                .collect(),
        )
    }

    #[test]
    fn test_join_keeps_methods_separate() {
        let mut table = ScoreTable::new(3);
        table
            .insert(
                DetectorKind::Hotelling,
                AnomalyResult::new(vec![false, true, false], vec![0.1, 9.0, 0.2], 3.84),
            )
            .unwrap();
        table
            .insert(
                DetectorKind::LocalOutlierFactor,
                AnomalyResult::new(vec![true, false, false], vec![-0.5, 0.3, 0.4], 0.0),
            )
            .unwrap();

        let rows = join(&series(3), &table).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].score(DetectorKind::Hotelling), Some(9.0));
        assert_eq!(rows[1].flagged_by(), vec![DetectorKind::Hotelling]);
        assert_eq!(rows[0].flagged_by(), vec![DetectorKind::LocalOutlierFactor]);
        assert!(!rows[2].is_flagged(DetectorKind::ChangeFinder));
        assert_eq!(rows[2].score(DetectorKind::ChangeFinder), None);
    }

    #[test]
    fn test_join_rejects_row_mismatch() {
        let table = ScoreTable::new(4);
        assert!(matches!(
            join(&series(3), &table),
            Err(DashboardError::LengthMismatch { x: 3, y: 4, .. })
        ));
    }
}
