//! # sensorscope
//!
//! Command-line reports for the machine temperature dataset.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anomaly_facade::{DetectorKind, PipelineConfig, ScoringPipeline};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dashboard::{join, JsonSink, RenderSink, Report, ReportOptions};
use data_facade::{CsvSeriesSource, Series, SeriesSource, DEFAULT_DATA_FILE};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "sensorscope=info,anomaly_core=info,data_core=info";

#[derive(Parser, Debug)]
#[command(name = "sensorscope")]
#[command(about = "Anomaly reports for machine temperature readings", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input CSV with `timestamp,value` columns
    #[arg(short, long, global = true, default_value = DEFAULT_DATA_FILE)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// JSON file with detector parameters
    #[arg(short, long, global = true)]
    params: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Temperature with known failure points and the daily mean
    TimeSeries,
    /// Year/month count, mean, max and min
    BarCharts,
    /// Temperature density overall, by year and by month
    AreaCharts,
    /// Score histograms of the scoring methods
    AnomalyScores,
    /// Detected points of every method
    AllModels,
    /// Date by time-of-day heatmap
    Heatmap,
    /// Mixed dashboard of selected panels
    Dashboard,
    /// Run one method and print the flagged rows
    Detect {
        /// Method (hotelling, ocsvm, iforest, lof, changefinder, variance)
        #[arg(short, long)]
        method: DetectorKind,
    },
}

impl Commands {
    fn report(&self) -> Option<Report> {
        match self {
            Commands::TimeSeries => Some(Report::TimeSeries),
            Commands::BarCharts => Some(Report::BarCharts),
            Commands::AreaCharts => Some(Report::AreaCharts),
            Commands::AnomalyScores => Some(Report::AnomalyScores),
            Commands::AllModels => Some(Report::AllModels),
            Commands::Heatmap => Some(Report::Heatmap),
            Commands::Dashboard => Some(Report::SelectedModels),
            Commands::Detect { .. } => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FlaggedRow {
    index: usize,
    timestamp: String,
    value: f64,
    score: f64,
}

#[derive(Debug, Serialize)]
struct DetectSummary {
    method: DetectorKind,
    threshold: f64,
    rows: usize,
    flagged_count: usize,
    flagged: Vec<FlaggedRow>,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();
}

fn load_series(path: &Path) -> Result<Series> {
    CsvSeriesSource::from_path(path)
        .load()
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn load_options(params: Option<&Path>) -> Result<ReportOptions> {
    let pipeline = match params {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read parameters from {}", path.display()))?;
            PipelineConfig::from_json(&json)
                .with_context(|| format!("Invalid parameters in {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    Ok(ReportOptions {
        pipeline,
        ..ReportOptions::default()
    })
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn run_report(report: Report, series: &Series, options: &ReportOptions, output: Option<&Path>) -> Result<()> {
    let board = report
        .build(series, options)
        .with_context(|| format!("Failed to build the {} report", report))?;
    let mut sink = JsonSink::pretty(open_output(output)?);
    sink.render(&board).context("Failed to write the dashboard")?;
    if let Some(path) = output {
        tracing::info!(path = %path.display(), report = %report, "dashboard written");
    }
    Ok(())
}

fn detect_summary(series: &Series, method: DetectorKind, config: PipelineConfig) -> Result<DetectSummary> {
    let table = ScoringPipeline::new()
        .with(method)
        .config(config)
        .run(&series.values())
        .with_context(|| format!("{} detection failed", method.title()))?;
    let threshold = table
        .result(method)
        .with_context(|| format!("{} produced no result", method.title()))?
        .threshold;

    let flagged: Vec<FlaggedRow> = join(series, &table)?
        .into_iter()
        .enumerate()
        .filter(|(_, row)| row.is_flagged(method))
        .map(|(index, row)| FlaggedRow {
            index,
            timestamp: row.reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            value: row.reading.value,
            score: row.score(method).unwrap_or(f64::NAN),
        })
        .collect();

    Ok(DetectSummary {
        method,
        threshold,
        rows: series.len(),
        flagged_count: flagged.len(),
        flagged,
    })
}

fn run_detect(series: &Series, method: DetectorKind, options: ReportOptions, output: Option<&Path>) -> Result<()> {
    let summary = detect_summary(series, method, options.pipeline)?;
    tracing::info!(method = %method, flagged = summary.flagged_count, "detection finished");

    let mut writer = open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, &summary).context("Failed to write the summary")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let CommonArgs { input, output, params } = cli.common;
    let options = load_options(params.as_deref())?;
    let series = load_series(&input)?;

    match cli.command {
        Commands::Detect { method } => run_detect(&series, method, options, output.as_deref()),
        command => {
            let report = command.report().context("Command has no report")?;
            run_report(report, &series, &options, output.as_deref())
        }
    }
}

fn main() {
    init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_facade::Reading;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sensorscope", "heatmap"]).unwrap();
        assert_eq!(cli.command, Commands::Heatmap);
        assert_eq!(cli.common.input, PathBuf::from(DEFAULT_DATA_FILE));
        assert!(cli.common.output.is_none());
        assert!(cli.common.params.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sensorscope",
            "dashboard",
            "--input",
            "data.csv",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.command.report(), Some(Report::SelectedModels));
        assert_eq!(cli.common.input, PathBuf::from("data.csv"));
        assert_eq!(cli.common.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_detect_method_parsed() {
        let cli = Cli::try_parse_from(["sensorscope", "detect", "--method", "iforest"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Detect {
                method: DetectorKind::IsolationForest
            }
        );
        assert!(cli.command.report().is_none());
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(Cli::try_parse_from(["sensorscope", "detect", "--method", "kmeans"]).is_err());
        assert!(Cli::try_parse_from(["sensorscope", "detect"]).is_err());
        assert!(Cli::try_parse_from(["sensorscope", "pie-charts"]).is_err());
    }

    #[test]
    fn test_every_subcommand_maps_to_a_report() {
        let names = [
            "time-series",
            "bar-charts",
            "area-charts",
            "anomaly-scores",
            "all-models",
            "heatmap",
            "dashboard",
        ];
        for name in names {
            let cli = Cli::try_parse_from(["sensorscope", name]).unwrap();
            assert_eq!(cli.command.report().map(|r| r.as_str()), Some(name));
        }
    }

    #[test]
    fn test_missing_params_file_fails() {
        assert!(load_options(Some(Path::new("/nonexistent/params.json"))).is_err());
        assert_eq!(load_options(None).unwrap(), ReportOptions::default());
    }

    #[test]
    fn test_detect_summary_lists_spike() {
        let start = chrono::NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let series = Series::new(
            (0..20)
                .map(|i| {
                    let value = if i == 7 { 200.0 } else { 80.0 + (i % 3) as f64 };
                    Reading::new(start + chrono::Duration::minutes(5 * i), value)
                })
                .collect(),
        );
        let summary = detect_summary(&series, DetectorKind::Hotelling, PipelineConfig::default()).unwrap();
        assert_eq!(summary.rows, 20);
        assert_eq!(summary.flagged_count, 1);
        assert_eq!(summary.flagged[0].index, 7);
        assert_eq!(summary.flagged[0].timestamp, "2014-01-01 00:35:00");
        assert_eq!(summary.flagged[0].value, 200.0);
        assert!(summary.flagged[0].score > summary.threshold);
    }
}
