//! Data models for sensor time series.

mod reading;
mod series;

pub use reading::Reading;
pub use series::Series;
