//! Ordered sensor series.

use serde::{Deserialize, Serialize};

use super::Reading;

/// Ordered sequence of readings for one run.
///
/// Source order is kept as-is; the input is expected to be sorted by
/// timestamp already.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    readings: Vec<Reading>,
}

impl Series {
    /// Create a series from readings in source order.
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the series has no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Borrow the readings.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Iterate over readings.
    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// First reading.
    pub fn first(&self) -> Option<&Reading> {
        self.readings.first()
    }

    /// Last reading.
    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Values column.
    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.value).collect()
    }

    /// Epoch-millisecond column, for date-time axes.
    pub fn epoch_millis(&self) -> Vec<f64> {
        self.readings.iter().map(Reading::epoch_millis).collect()
    }

    /// Smallest value, `None` when empty.
    pub fn min_value(&self) -> Option<f64> {
        self.readings.iter().map(|r| r.value).reduce(f64::min)
    }

    /// Largest value, `None` when empty.
    pub fn max_value(&self) -> Option<f64> {
        self.readings.iter().map(|r| r.value).reduce(f64::max)
    }

    /// Readings at the given positions, in the given order.
    pub fn select(&self, indices: &[usize]) -> Vec<Reading> {
        indices
            .iter()
            .filter_map(|&i| self.readings.get(i).copied())
            .collect()
    }
}

impl From<Vec<Reading>> for Series {
    fn from(readings: Vec<Reading>) -> Self {
        Self::new(readings)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
