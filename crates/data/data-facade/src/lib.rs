//! Sensor Data Facade
//!
//! Unified re-exports for the data module.
//!
//! This facade provides a single entry point for all data functionality:
//! - `data_spi` - Reading/series model, errors, and the source contract
//! - `data_api` - Loader configuration and known failure windows
//! - `data_core` - CSV source, window labelling, daily means
//!
//! # Example
//!
//! ```rust,no_run
//! use data_facade::{CsvSeriesSource, SeriesSource};
//!
//! let series = CsvSeriesSource::from_path("machine_temperature_system_failure.csv")
//!     .load()
//!     .unwrap();
//! println!("Got {} readings", series.len());
//! ```

// Re-export everything from SPI
pub use data_spi::*;

// Re-export everything from API
pub use data_api::*;

// Re-export everything from Core
pub use data_core::*;
