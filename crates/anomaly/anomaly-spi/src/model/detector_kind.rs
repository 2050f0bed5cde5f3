//! Detector method identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnomalyError;

/// The scoring methods the pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Squared standardized deviation against a chi-square critical value
    Hotelling,
    /// RBF one-class support vector machine
    OneClassSvm,
    /// Random isolation tree ensemble
    IsolationForest,
    /// k-nearest-neighbour density ratio
    LocalOutlierFactor,
    /// Two-stage sequential discounting AR change score
    ChangeFinder,
    /// Mean plus/minus a multiple of the standard deviation
    VarianceBand,
}

impl DetectorKind {
    /// Every kind, in report order.
    pub const ALL: [DetectorKind; 6] = [
        DetectorKind::Hotelling,
        DetectorKind::OneClassSvm,
        DetectorKind::IsolationForest,
        DetectorKind::LocalOutlierFactor,
        DetectorKind::ChangeFinder,
        DetectorKind::VarianceBand,
    ];

    /// Short identifier used on the command line and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Hotelling => "hotelling",
            DetectorKind::OneClassSvm => "ocsvm",
            DetectorKind::IsolationForest => "iforest",
            DetectorKind::LocalOutlierFactor => "lof",
            DetectorKind::ChangeFinder => "changefinder",
            DetectorKind::VarianceBand => "variance",
        }
    }

    /// Name of the score column.
    pub fn score_column(&self) -> &'static str {
        match self {
            DetectorKind::Hotelling => "hotelling_score",
            DetectorKind::OneClassSvm => "ocsvm_score",
            DetectorKind::IsolationForest => "iforest_score",
            DetectorKind::LocalOutlierFactor => "lof_score",
            DetectorKind::ChangeFinder => "changefinder_score",
            DetectorKind::VarianceBand => "variance_score",
        }
    }

    /// Human-readable title for chart headings.
    pub fn title(&self) -> &'static str {
        match self {
            DetectorKind::Hotelling => "Hotelling's T²",
            DetectorKind::OneClassSvm => "One-Class SVM",
            DetectorKind::IsolationForest => "Isolation Forest",
            DetectorKind::LocalOutlierFactor => "LOF",
            DetectorKind::ChangeFinder => "ChangeFinder",
            DetectorKind::VarianceBand => "Variance Based Method",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = AnomalyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hotelling" | "t2" => Ok(DetectorKind::Hotelling),
            "ocsvm" | "one-class-svm" | "svm" => Ok(DetectorKind::OneClassSvm),
            "iforest" | "isolation-forest" => Ok(DetectorKind::IsolationForest),
            "lof" | "local-outlier-factor" => Ok(DetectorKind::LocalOutlierFactor),
            "changefinder" | "cf" => Ok(DetectorKind::ChangeFinder),
            "variance" | "sigma" => Ok(DetectorKind::VarianceBand),
            other => Err(AnomalyError::InvalidParameter {
                name: "method".to_string(),
                reason: format!("unknown detector '{}'", other),
            }),
        }
    }
}
