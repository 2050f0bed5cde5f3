//! Error types for sensor data loading.

mod data_error;

pub use data_error::{DataError, Result};
