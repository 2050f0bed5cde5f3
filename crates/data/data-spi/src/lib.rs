//! Sensor Data Service Provider Interface
//!
//! Defines the reading/series model, errors, and the contract for series
//! sources.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::SeriesSource;
pub use error::{DataError, Result};
pub use model::{Reading, Series};
