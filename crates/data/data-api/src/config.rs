//! Loader configuration types.

use std::path::PathBuf;

use data_spi::{DataError, Result};
use serde::{Deserialize, Serialize};

/// File name of the machine temperature dataset.
pub const DEFAULT_DATA_FILE: &str = "machine_temperature_system_failure.csv";

/// Configuration for loading a series from a CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Path to the CSV file
    pub path: PathBuf,
    /// Header name of the timestamp column
    pub timestamp_column: String,
    /// Header name of the value column
    pub value_column: String,
    /// chrono formats tried in order for each timestamp cell
    pub timestamp_formats: Vec<String>,
}

impl LoaderConfig {
    /// Create a configuration with the default column names and formats.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timestamp_column: "timestamp".to_string(),
            value_column: "value".to_string(),
            timestamp_formats: vec![
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%d".to_string(),
            ],
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

/// Builder for LoaderConfig.
#[derive(Debug, Default)]
pub struct LoaderConfigBuilder {
    path: Option<PathBuf>,
    timestamp_column: Option<String>,
    value_column: Option<String>,
    timestamp_formats: Option<Vec<String>>,
}

impl LoaderConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSV path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the timestamp column name.
    pub fn timestamp_column(mut self, name: &str) -> Self {
        self.timestamp_column = Some(name.to_string());
        self
    }

    /// Set the value column name.
    pub fn value_column(mut self, name: &str) -> Self {
        self.value_column = Some(name.to_string());
        self
    }

    /// Replace the timestamp formats.
    pub fn timestamp_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timestamp_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<LoaderConfig> {
        let path = self
            .path
            .ok_or_else(|| DataError::InvalidConfig("path is required".to_string()))?;
        let mut config = LoaderConfig::new(path);

        if let Some(column) = self.timestamp_column {
            config.timestamp_column = column;
        }
        if let Some(column) = self.value_column {
            config.value_column = column;
        }
        if let Some(formats) = self.timestamp_formats {
            if formats.is_empty() {
                return Err(DataError::InvalidConfig(
                    "at least one timestamp format is required".to_string(),
                ));
            }
            config.timestamp_formats = formats;
        }
        if config.timestamp_column == config.value_column {
            return Err(DataError::InvalidConfig(format!(
                "timestamp and value columns must differ (both '{}')",
                config.value_column
            )));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.path, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.timestamp_column, "timestamp");
        assert_eq!(config.value_column, "value");
        assert_eq!(config.timestamp_formats.len(), 3);
    }

    #[test]
    fn test_builder_success() {
        let config = LoaderConfigBuilder::new()
            .path("readings.csv")
            .timestamp_column("time")
            .value_column("temp")
            .timestamp_formats(["%d/%m/%Y %H:%M"])
            .build()
            .unwrap();

        assert_eq!(config.path, PathBuf::from("readings.csv"));
        assert_eq!(config.timestamp_column, "time");
        assert_eq!(config.value_column, "temp");
        assert_eq!(config.timestamp_formats, vec!["%d/%m/%Y %H:%M".to_string()]);
    }

    #[test]
    fn test_builder_missing_path() {
        let result = LoaderConfigBuilder::new().value_column("temp").build();
        assert!(matches!(result, Err(DataError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_rejects_empty_formats() {
        let result = LoaderConfigBuilder::new()
            .path("x.csv")
            .timestamp_formats(Vec::<String>::new())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_same_columns() {
        let result = LoaderConfigBuilder::new()
            .path("x.csv")
            .timestamp_column("value")
            .build();
        assert!(result.is_err());
    }
}
