//! Integration tests for the anomaly crates
//!
//! Exercises the detector contract through trait objects and the method
//! registry.

use anomaly_facade::prelude::*;
use anomaly_facade::{detector_for, threshold, LofConfig};

fn values() -> Vec<f64> {
    let mut v: Vec<f64> = (0..150).map(|i| 60.0 + ((i * 7) % 11) as f64 * 0.5).collect();
    v[75] = 140.0;
    v
}

#[test]
fn test_detector_for_builds_every_kind() {
    let config = PipelineConfig::default();
    for kind in DetectorKind::ALL {
        let detector = detector_for(kind, &config).unwrap();
        assert_eq!(detector.kind(), kind);
        assert!(!detector.is_fitted());
    }
}

#[test]
fn test_unfitted_detectors_refuse_to_score() {
    let config = PipelineConfig::default();
    for kind in DetectorKind::ALL {
        let detector = detector_for(kind, &config).unwrap();
        assert!(
            matches!(detector.score(&[1.0, 2.0]), Err(AnomalyError::NotFitted)),
            "{kind}"
        );
    }
}

#[test]
fn test_method_names_parse() {
    for kind in DetectorKind::ALL {
        let parsed: DetectorKind = kind.as_str().parse().unwrap();
        assert_eq!(parsed, kind);
    }
    assert!("median".parse::<DetectorKind>().is_err());
}

#[test]
fn test_fit_then_detect_matches_fit_detect() {
    let data = values();
    let mut a = LofDetector::from_config(LofConfig::new(12, 0.05)).unwrap();
    a.fit(&data).unwrap();
    let separate = a.detect(&data).unwrap();

    let mut b = LofDetector::from_config(LofConfig::new(12, 0.05)).unwrap();
    let combined = b.fit_detect(&data).unwrap();

    assert_eq!(separate, combined);
    assert!(combined.is_anomaly[75]);
}

#[test]
fn test_flags_follow_threshold_rules() {
    let data = values();
    let config = PipelineConfig::default();

    let mut hotelling = detector_for(DetectorKind::Hotelling, &config).unwrap();
    let result = hotelling.fit_detect(&data).unwrap();
    for (flag, score) in result.is_anomaly.iter().zip(&result.scores) {
        assert_eq!(*flag, threshold::exceeds(*score, result.threshold));
    }

    let mut svm = detector_for(DetectorKind::OneClassSvm, &config).unwrap();
    let result = svm.fit_detect(&data).unwrap();
    for (flag, score) in result.is_anomaly.iter().zip(&result.scores) {
        assert_eq!(*flag, threshold::non_positive(*score));
    }
}

#[test]
fn test_score_table_rejects_wrong_length() {
    let mut table = ScoreTable::new(3);
    let short = AnomalyResult::new(vec![false], vec![0.0], 1.0);
    assert!(table.insert(DetectorKind::Hotelling, short).is_err());
}
