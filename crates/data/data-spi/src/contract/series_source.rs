//! Series source trait definition.

use crate::error::Result;
use crate::model::Series;

/// Something that can produce a complete, ordered sensor series.
///
/// A load is all-or-nothing: implementations never return a partial series.
pub trait SeriesSource {
    /// Source name, used in log lines.
    fn name(&self) -> &str;

    /// Load the whole series.
    fn load(&self) -> Result<Series>;
}
