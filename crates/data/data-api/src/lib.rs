//! Sensor Data API
//!
//! Configuration types and builders for loading sensor series.

mod config;
mod windows;

pub use config::{LoaderConfig, LoaderConfigBuilder, DEFAULT_DATA_FILE};
pub use windows::{default_failure_windows, AnomalyWindow};

// Re-export SPI types
pub use data_spi::{DataError, Reading, Result, Series, SeriesSource};
