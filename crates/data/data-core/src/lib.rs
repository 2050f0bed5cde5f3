//! Sensor Data Core
//!
//! Implementations for loading and labelling sensor series.

pub mod csv_source;
mod daily;
mod labels;

pub use csv_source::{parse_timestamp, CsvSeriesSource};
pub use daily::{daily_mean, DailyMean};
pub use labels::{label_windows, window_indices};
