//! Descriptive aggregates over a sensor series.
//!
//! Everything here is a pure function of its input and produces plain data
//! ready to be placed in a chart.

mod density;
mod error;
mod group;
mod heatmap;
mod histogram;

pub use density::{density_by, density_over_range, linspace, DensityGrid, EmptyGroupPolicy, GaussianKde};
pub use error::{AggregateError, Result};
pub use group::{group_by, stacked_year_month, CalendarKey, GroupKey, Reduction, StackedBars, StackedGroup};
pub use heatmap::{heatmap_pivot, HeatmapGrid, SLOT_MINUTES};
pub use histogram::{histogram, Histogram, DEFAULT_BINS};
