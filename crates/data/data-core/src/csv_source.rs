//! CSV series source.
//!
//! Reads a `timestamp,value` file into a [`Series`]. Any malformed row aborts
//! the load; there is no skip-and-continue mode.

use std::fs::File;
use std::io::{BufReader, Read};

use chrono::{NaiveDate, NaiveDateTime};
use data_api::LoaderConfig;
use data_spi::{DataError, Reading, Result, Series, SeriesSource};

/// Series source backed by a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    config: LoaderConfig,
}

impl CsvSeriesSource {
    /// Create a source from a loader configuration.
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Create a source for `path` with default columns and formats.
    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(LoaderConfig::new(path))
    }

    /// Get the configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Parse CSV content from any reader.
    pub fn read_from<R: Read>(&self, input: R) -> Result<Series> {
        let mut reader = csv::Reader::from_reader(input);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let column_index = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        let ts_idx = column_index(&self.config.timestamp_column)?;
        let value_idx = column_index(&self.config.value_column)?;

        let mut readings = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(csv_error)?;

            let raw_ts = record.get(ts_idx).unwrap_or("").trim();
            let timestamp = parse_timestamp(raw_ts, &self.config.timestamp_formats).ok_or_else(
                || DataError::ParseTimestamp {
                    row,
                    column: self.config.timestamp_column.clone(),
                    value: raw_ts.to_string(),
                },
            )?;

            let raw_value = record.get(value_idx).unwrap_or("").trim();
            let value = raw_value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::ParseValue {
                    row,
                    column: self.config.value_column.clone(),
                    value: raw_value.to_string(),
                })?;

            readings.push(Reading::new(timestamp, value));
        }

        if readings.is_empty() {
            return Err(DataError::NoData);
        }

        Ok(Series::new(readings))
    }
}

impl SeriesSource for CsvSeriesSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Series> {
        let file = File::open(&self.config.path)?;
        let series = self.read_from(BufReader::new(file))?;
        tracing::info!(
            source = self.name(),
            path = %self.config.path.display(),
            rows = series.len(),
            "loaded sensor series"
        );
        Ok(series)
    }
}

/// Parse a timestamp with the first matching format.
///
/// Formats without a time component are read as midnight.
pub fn parse_timestamp(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format).ok().or_else(|| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}

fn csv_error(e: csv::Error) -> DataError {
    DataError::Csv {
        line: e.position().map(|p| p.line()).unwrap_or(0),
        message: e.to_string(),
    }
}
