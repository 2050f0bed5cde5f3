//! End-to-end tests for the anomaly crates
//!
//! Runs complete scoring workflows using only the facade API.

use anomaly_facade::prelude::*;
use anomaly_facade::{ChangeFinderConfig, IsolationForestConfig, LofConfig, OneClassSvmConfig};

/// Temperature-like series: slow daily cycle around 85 with two failures.
fn temperature_series() -> Vec<f64> {
    let mut data: Vec<f64> = (0..400)
        .map(|i| {
            let t = i as f64;
            85.0 + (t * 0.05).sin() * 3.0 + ((i * 13) % 7) as f64 * 0.1
        })
        .collect();
    data[120] = 10.0;
    data[330] = 5.0;
    data
}

fn quick_config() -> PipelineConfig {
    PipelineConfig {
        one_class_svm: OneClassSvmConfig::new(0.05, 0.01),
        isolation_forest: IsolationForestConfig::new(100, 128, 0.02),
        lof: LofConfig::new(20, 0.02),
        change_finder: ChangeFinderConfig::new(0.02, 1, 15),
        ..PipelineConfig::default()
    }
}

#[test]
fn e2e_hotelling_flags_single_spike() {
    let values = [10.0, 12.0, 11.0, 100.0, 10.5];
    let table = ScoringPipeline::new()
        .with(DetectorKind::Hotelling)
        .run(&values)
        .unwrap();

    assert_eq!(
        table.flags(DetectorKind::Hotelling).unwrap(),
        &[false, false, false, true, false]
    );
    let threshold = table.result(DetectorKind::Hotelling).unwrap().threshold;
    assert!((threshold - 3.84).abs() < 0.01);
}

#[test]
fn e2e_batch_detectors_find_failures() {
    let data = temperature_series();
    let table = ScoringPipeline::new()
        .selected(&[
            DetectorKind::Hotelling,
            DetectorKind::OneClassSvm,
            DetectorKind::IsolationForest,
            DetectorKind::LocalOutlierFactor,
            DetectorKind::VarianceBand,
        ])
        .config(quick_config())
        .run(&data)
        .unwrap();

    for kind in table.kinds() {
        let flagged = table.flagged_indices(kind);
        assert!(flagged.contains(&120), "{kind} missed 120: {flagged:?}");
        assert!(flagged.contains(&330), "{kind} missed 330: {flagged:?}");
    }
}

#[test]
fn e2e_all_methods_cover_every_row() {
    let data = temperature_series();
    let table = ScoringPipeline::new()
        .with_all()
        .config(quick_config())
        .run(&data)
        .unwrap();

    assert_eq!(table.rows(), data.len());
    for (kind, result) in table.iter() {
        assert_eq!(result.len(), data.len(), "{kind}");
        assert_eq!(result.is_anomaly.len(), data.len(), "{kind}");
        assert!(result.scores.iter().all(|s| s.is_finite()), "{kind}");
    }
}

#[test]
fn e2e_change_finder_runs_repeat_exactly() {
    let data = temperature_series();
    let config = ChangeFinderConfig::new(0.02, 1, 15);

    let first = ChangeFinderDetector::from_config(config)
        .unwrap()
        .fit_detect(&data)
        .unwrap();
    let second = ChangeFinderDetector::from_config(config)
        .unwrap()
        .fit_detect(&data)
        .unwrap();

    assert_eq!(first.scores, second.scores);
    assert_eq!(first.is_anomaly, second.is_anomaly);
}

#[test]
fn e2e_json_parameters_drive_pipeline() {
    let config = PipelineConfig::from_json(
        r#"{
            "isolation_forest": {"n_estimators": 40, "max_samples": 64, "seed": 7},
            "lof": {"n_neighbors": 15}
        }"#,
    )
    .unwrap();
    assert_eq!(config.isolation_forest.contamination, 0.1);

    let data = temperature_series();
    let table = ScoringPipeline::new()
        .selected(&[DetectorKind::IsolationForest, DetectorKind::LocalOutlierFactor])
        .config(config)
        .run(&data)
        .unwrap();
    assert_eq!(table.kinds().len(), 2);
}

#[test]
fn e2e_constant_series_is_an_error() {
    let err = ScoringPipeline::new()
        .with(DetectorKind::VarianceBand)
        .run(&[72.0; 50])
        .unwrap_err();
    assert!(matches!(err, AnomalyError::DegenerateInput(_)));
}
