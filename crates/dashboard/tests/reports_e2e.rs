//! End-to-end: CSV on disk to a rendered JSON dashboard.

use std::io::Write;

use chrono::{Duration, NaiveDate};
use dashboard::chart::XyChart;
use dashboard::{join, Chart, DashboardError, JsonSink, RenderSink, Report, ReportOptions};
use anomaly_facade::{ChangeFinderConfig, DetectorKind, IsolationForestConfig, LofConfig, PipelineConfig, ScoringPipeline};
use data_facade::{CsvSeriesSource, Series, SeriesSource};
use tempfile::NamedTempFile;

/// Two-hourly readings from 2013-12-08 for 20 days, spike at row 100.
fn write_dataset() -> NamedTempFile {
    let start = NaiveDate::from_ymd_opt(2013, 12, 8)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,value").unwrap();
    for i in 0..240 {
        let ts = start + Duration::hours(2 * i);
        let value = if i == 100 { 10.0 } else { 80.0 + ((i * 5) % 11) as f64 * 0.3 };
        writeln!(file, "{},{}", ts.format("%Y-%m-%d %H:%M:%S"), value).unwrap();
    }
    file
}

fn load() -> Series {
    let file = write_dataset();
    CsvSeriesSource::from_path(file.path()).load().unwrap()
}

fn options() -> ReportOptions {
    ReportOptions {
        pipeline: PipelineConfig {
            isolation_forest: IsolationForestConfig::new(50, 64, 0.1),
            lof: LofConfig::new(10, 0.07),
            change_finder: ChangeFinderConfig::new(0.02, 1, 7),
            ..PipelineConfig::default()
        },
        ..ReportOptions::default()
    }
}

fn xy<'a>(board: &'a dashboard::Dashboard, title: &str) -> &'a XyChart {
    match &board.panel(title).unwrap().chart {
        Chart::Xy(chart) => chart,
        other => panic!("expected xy chart, got {other:?}"),
    }
}

#[test]
fn test_every_report_renders_to_json() {
    let series = load();
    let options = options();
    for report in Report::ALL {
        let board = report.build(&series, &options).unwrap();
        let mut sink = JsonSink::new(Vec::new());
        sink.render(&board).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(value["panels"].as_array().unwrap().len(), board.panels.len(), "{report}");
    }
}

#[test]
fn test_time_series_labels_first_two_failure_windows() {
    let series = load();
    let board = Report::TimeSeries.build(&series, &options()).unwrap();
    let chart = xy(&board, "Temperature & Given Anomaly Points");
    // 23 readings in the first window, 24 in the second
    assert_eq!(chart.series[1].len(), 47);
}

#[test]
fn test_join_matches_detected_points() {
    let series = load();
    let table = ScoringPipeline::new()
        .with_all()
        .config(options().pipeline)
        .run(&series.values())
        .unwrap();
    let rows = join(&series, &table).unwrap();
    assert!(rows[100].is_flagged(DetectorKind::Hotelling));

    let board = dashboard::all_models_report(&series, &options()).unwrap();
    for kind in DetectorKind::ALL {
        let chart = xy(&board, &format!("{} - Detected Points", kind.title()));
        let flagged = rows.iter().filter(|r| r.is_flagged(kind)).count();
        assert_eq!(chart.series[1].len(), flagged, "{kind}");
    }
}

#[test]
fn test_invalid_parameters_surface() {
    let series = load();
    let mut options = options();
    options.pipeline.lof = LofConfig::new(0, 0.07);
    let err = Report::AllModels.build(&series, &options).unwrap_err();
    assert!(matches!(err, DashboardError::Anomaly(_)));
}
