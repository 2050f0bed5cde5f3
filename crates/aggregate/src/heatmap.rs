//! Date × time-of-day pivot.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Timelike};
use data_spi::Series;
use serde::{Deserialize, Serialize};

use crate::error::{AggregateError, Result};

/// Width of a time-of-day slot.
pub const SLOT_MINUTES: u32 = 5;

/// Mean value per (time slot, date).
///
/// `values[t][d]` is the cell for `times[t]` and `dates[d]`: rows are time
/// slots and columns are dates, both ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    pub dates: Vec<NaiveDate>,
    pub times: Vec<NaiveTime>,
    pub values: Vec<Vec<f64>>,
    /// Value written into cells with no reading.
    pub fill: f64,
}

impl HeatmapGrid {
    /// Number of time-slot rows.
    pub fn rows(&self) -> usize {
        self.times.len()
    }

    /// Number of date columns.
    pub fn columns(&self) -> usize {
        self.dates.len()
    }

    /// Smallest and largest cell value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn slot_of(time: NaiveTime) -> NaiveTime {
    let minute = time.minute() - time.minute() % SLOT_MINUTES;
    NaiveTime::from_hms_opt(time.hour(), minute, 0).unwrap_or(time)
}

/// Pivot the series into a time-slot × date grid.
///
/// Times are floored to [`SLOT_MINUTES`]; several readings in one cell are
/// averaged. Empty cells get the mean of the per-slot means.
pub fn heatmap_pivot(series: &Series) -> Result<HeatmapGrid> {
    if series.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let mut cells: BTreeMap<(NaiveTime, NaiveDate), (f64, usize)> = BTreeMap::new();
    let mut dates: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for reading in series {
        let entry = cells
            .entry((slot_of(reading.time_of_day()), reading.date()))
            .or_insert((0.0, 0));
        entry.0 += reading.value;
        entry.1 += 1;
        dates.insert(reading.date(), 0);
    }
    for (column, index) in dates.values_mut().enumerate() {
        *index = column;
    }

    let mut rows: BTreeMap<NaiveTime, Vec<Option<f64>>> = BTreeMap::new();
    for ((time, date), (sum, count)) in &cells {
        let row = rows.entry(*time).or_insert_with(|| vec![None; dates.len()]);
        row[dates[date]] = Some(sum / *count as f64);
    }

    let slot_means: Vec<f64> = rows
        .values()
        .map(|row| {
            let present: Vec<f64> = row.iter().flatten().copied().collect();
            present.iter().sum::<f64>() / present.len() as f64
        })
        .collect();
    let fill = slot_means.iter().sum::<f64>() / slot_means.len() as f64;

    let times: Vec<NaiveTime> = rows.keys().copied().collect();
    let values = rows
        .into_values()
        .map(|row| row.into_iter().map(|cell| cell.unwrap_or(fill)).collect())
        .collect();

    tracing::debug!(rows = times.len(), columns = dates.len(), fill, "heatmap pivot built");

    Ok(HeatmapGrid {
        dates: dates.into_keys().collect(),
        times,
        values,
        fill,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_spi::Reading;

    fn reading(day: u32, h: u32, m: u32, value: f64) -> Reading {
        let ts = NaiveDate::from_ymd_opt(2014, 1, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap();
        Reading::new(ts, value)
    }

    #[test]
    fn test_two_by_two_grid() {
        let series = Series::new(vec![
            reading(1, 0, 0, 1.0),
            reading(1, 0, 5, 2.0),
            reading(2, 0, 0, 3.0),
            reading(2, 0, 5, 4.0),
        ]);
        let grid = heatmap_pivot(&series).unwrap();

        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 2);
        // rows are time slots, columns are dates
        assert_eq!(grid.values, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn test_missing_cell_gets_mean_of_slot_means() {
        let series = Series::new(vec![
            reading(1, 0, 0, 1.0),
            reading(1, 0, 5, 2.0),
            reading(2, 0, 0, 3.0),
        ]);
        let grid = heatmap_pivot(&series).unwrap();
        // slot means: 00:00 -> 2.0, 00:05 -> 2.0
        assert_eq!(grid.fill, 2.0);
        assert_eq!(grid.values[1][1], 2.0);
    }

    #[test]
    fn test_duplicates_averaged_and_floored() {
        let series = Series::new(vec![
            reading(1, 10, 1, 10.0),
            reading(1, 10, 4, 20.0),
            reading(1, 10, 7, 5.0),
        ]);
        let grid = heatmap_pivot(&series).unwrap();
        assert_eq!(
            grid.times,
            vec![
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 5, 0).unwrap()
            ]
        );
        assert_eq!(grid.values, vec![vec![15.0], vec![5.0]]);
        assert_eq!(grid.value_range(), Some((5.0, 15.0)));
    }

    #[test]
    fn test_empty_series() {
        assert!(matches!(
            heatmap_pivot(&Series::new(Vec::new())),
            Err(AggregateError::EmptyInput)
        ));
    }
}
