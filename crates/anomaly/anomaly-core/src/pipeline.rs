//! Runs a selection of detectors over one series.

use anomaly_api::PipelineConfig;
use anomaly_spi::{AnomalyDetector, DetectorKind, Result, ScoreTable};

use crate::change_finder::ChangeFinderDetector;
use crate::hotelling::HotellingDetector;
use crate::isolation_forest::IsolationForestDetector;
use crate::lof::LofDetector;
use crate::one_class_svm::OneClassSvmDetector;
use crate::variance_band::VarianceBandDetector;

/// Build an unfitted detector of `kind` from its section of `config`.
pub fn detector_for(kind: DetectorKind, config: &PipelineConfig) -> Result<Box<dyn AnomalyDetector>> {
    let detector: Box<dyn AnomalyDetector> = match kind {
        DetectorKind::Hotelling => Box::new(HotellingDetector::from_config(config.hotelling)?),
        DetectorKind::OneClassSvm => Box::new(OneClassSvmDetector::from_config(config.one_class_svm)?),
        DetectorKind::IsolationForest => {
            Box::new(IsolationForestDetector::from_config(config.isolation_forest)?)
        }
        DetectorKind::LocalOutlierFactor => Box::new(LofDetector::from_config(config.lof)?),
        DetectorKind::ChangeFinder => Box::new(ChangeFinderDetector::from_config(config.change_finder)?),
        DetectorKind::VarianceBand => Box::new(VarianceBandDetector::from_config(config.variance_band)?),
    };
    Ok(detector)
}

/// Scoring pipeline.
///
/// Every run builds fresh detectors, so results depend only on the values
/// and the configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    kinds: Vec<DetectorKind>,
    config: PipelineConfig,
}

impl ScoringPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one method; duplicates are ignored.
    pub fn with(mut self, kind: DetectorKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// Add every method in [`DetectorKind::ALL`] order.
    pub fn with_all(self) -> Self {
        DetectorKind::ALL.iter().fold(self, |p, &k| p.with(k))
    }

    /// Add the given methods in order.
    pub fn selected(self, kinds: &[DetectorKind]) -> Self {
        kinds.iter().fold(self, |p, &k| p.with(k))
    }

    /// Replace the detector parameters.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Methods that will run, in order.
    pub fn kinds(&self) -> &[DetectorKind] {
        &self.kinds
    }

    /// Fit and detect every selected method on `values`.
    pub fn run(&self, values: &[f64]) -> Result<ScoreTable> {
        self.config.validate()?;
        let mut table = ScoreTable::new(values.len());
        for &kind in &self.kinds {
            let mut detector = detector_for(kind, &self.config)?;
            let result = detector.fit_detect(values)?;
            tracing::debug!(
                method = kind.as_str(),
                flagged = result.anomaly_count(),
                threshold = result.threshold,
                "detector finished"
            );
            table.insert(kind, result)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anomaly_api::{IsolationForestConfig, LofConfig};

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            isolation_forest: IsolationForestConfig::new(50, 64, 0.1),
            lof: LofConfig::new(10, 0.07),
            change_finder: anomaly_api::ChangeFinderConfig::new(0.02, 1, 7),
            ..PipelineConfig::default()
        }
    }

    fn values() -> Vec<f64> {
        let mut v: Vec<f64> = (0..120).map(|i| 80.0 + ((i * 11) % 9) as f64 * 0.4).collect();
        v[60] = 20.0;
        v
    }

    #[test]
    fn test_runs_selected_in_order() {
        let table = ScoringPipeline::new()
            .selected(&[DetectorKind::LocalOutlierFactor, DetectorKind::Hotelling])
            .config(small_config())
            .run(&values())
            .unwrap();
        assert_eq!(
            table.kinds(),
            vec![DetectorKind::LocalOutlierFactor, DetectorKind::Hotelling]
        );
        assert_eq!(table.rows(), 120);
    }

    #[test]
    fn test_with_all_covers_every_kind() {
        let data = values();
        let table = ScoringPipeline::new()
            .with_all()
            .config(small_config())
            .run(&data)
            .unwrap();
        assert_eq!(table.kinds(), DetectorKind::ALL.to_vec());
        for kind in DetectorKind::ALL {
            assert_eq!(table.scores(kind).map(|s| s.len()), Some(data.len()));
        }
        assert!(table.flags(DetectorKind::Hotelling).unwrap()[60]);
    }

    #[test]
    fn test_duplicates_ignored() {
        let pipeline = ScoringPipeline::new()
            .with(DetectorKind::Hotelling)
            .with(DetectorKind::Hotelling);
        assert_eq!(pipeline.kinds(), &[DetectorKind::Hotelling]);
    }

    #[test]
    fn test_runs_are_reproducible() {
        let pipeline = ScoringPipeline::new().with_all().config(small_config());
        let data = values();
        assert_eq!(pipeline.run(&data).unwrap(), pipeline.run(&data).unwrap());
    }

    #[test]
    fn test_degenerate_series_fails() {
        let err = ScoringPipeline::new()
            .with(DetectorKind::Hotelling)
            .run(&[1.0; 10])
            .unwrap_err();
        assert!(matches!(err, anomaly_spi::AnomalyError::DegenerateInput(_)));
    }
}
