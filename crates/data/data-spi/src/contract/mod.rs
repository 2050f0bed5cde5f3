//! Contract definitions for series sources.

mod series_source;

pub use series_source::SeriesSource;
