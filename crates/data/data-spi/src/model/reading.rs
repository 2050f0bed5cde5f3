//! Single sensor reading.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single `(timestamp, value)` sample.
///
/// Calendar fields are derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Wall-clock timestamp as written in the source (no zone)
    pub timestamp: NaiveDateTime,
    /// Sensor value
    pub value: f64,
}

impl Reading {
    /// Create a new reading.
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    /// Calendar date.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Time of day.
    pub fn time_of_day(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Unix epoch in milliseconds, reading the naive timestamp as UTC.
    pub fn epoch_millis(&self) -> f64 {
        self.timestamp.and_utc().timestamp_millis() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_calendar_fields() {
        let reading = Reading::new(ts("2013-12-02 21:15:00"), 73.96);
        assert_eq!(reading.year(), 2013);
        assert_eq!(reading.month(), 12);
        assert_eq!(reading.date(), NaiveDate::from_ymd_opt(2013, 12, 2).unwrap());
        assert_eq!(
            reading.time_of_day(),
            NaiveTime::from_hms_opt(21, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_epoch_millis_is_utc() {
        let reading = Reading::new(ts("1970-01-01 00:01:00"), 0.0);
        assert_eq!(reading.epoch_millis(), 60_000.0);

        let reading = Reading::new(ts("2014-01-01 00:00:00"), 0.0);
        assert_eq!(reading.epoch_millis(), 1_388_534_400_000.0);
    }
}
