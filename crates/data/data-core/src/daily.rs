//! Daily mean series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use data_spi::Series;
use serde::{Deserialize, Serialize};

/// Mean value of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyMean {
    pub date: NaiveDate,
    /// Midnight of `date` as UTC epoch milliseconds
    pub epoch_millis: f64,
    pub mean: f64,
}

/// Mean value per calendar day, ordered by date.
pub fn daily_mean(series: &Series) -> Vec<DailyMean> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for reading in series {
        let entry = sums.entry(reading.date()).or_insert((0.0, 0));
        entry.0 += reading.value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(date, (sum, count))| DailyMean {
            date,
            epoch_millis: date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis() as f64)
                .unwrap_or(f64::NAN),
            mean: sum / count as f64,
        })
        .collect()
}
