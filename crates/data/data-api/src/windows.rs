//! Known failure windows of the machine temperature dataset.

use chrono::NaiveDateTime;
use data_spi::{DataError, Result};
use serde::{Deserialize, Serialize};

const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Labelled failure periods shipped with the dataset.
const FAILURE_WINDOWS: [(&str, &str); 4] = [
    ("2013-12-10 06:25:00.000000", "2013-12-12 05:35:00.000000"),
    ("2013-12-15 17:50:00.000000", "2013-12-17 17:00:00.000000"),
    ("2014-01-27 14:20:00.000000", "2014-01-29 13:30:00.000000"),
    ("2014-02-07 14:55:00.000000", "2014-02-09 14:05:00.000000"),
];

/// Inclusive `[start, end]` time range flagged as a known anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl AnomalyWindow {
    /// Create a window; `start` must not be after `end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(DataError::InvalidConfig(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `YYYY-MM-DD HH:MM:SS[.ffffff]` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let parse = |s: &str| {
            NaiveDateTime::parse_from_str(s, WINDOW_FORMAT)
                .map_err(|e| DataError::InvalidConfig(format!("window bound {:?}: {}", s, e)))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// Whether `timestamp` falls inside the window, bounds included.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// The four failure windows labelled in the machine temperature dataset.
pub fn default_failure_windows() -> Result<Vec<AnomalyWindow>> {
    FAILURE_WINDOWS
        .iter()
        .map(|(start, end)| AnomalyWindow::parse(start, end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_default_windows_parse() {
        let windows = default_failure_windows().unwrap();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].start, ts("2013-12-10 06:25:00"));
        assert_eq!(windows[3].end, ts("2014-02-09 14:05:00"));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = AnomalyWindow::new(ts("2014-01-01 00:00:00"), ts("2014-01-02 00:00:00"))
            .unwrap();
        assert!(window.contains(ts("2014-01-01 00:00:00")));
        assert!(window.contains(ts("2014-01-01 12:30:00")));
        assert!(window.contains(ts("2014-01-02 00:00:00")));
        assert!(!window.contains(ts("2014-01-02 00:05:00")));
        assert!(!window.contains(ts("2013-12-31 23:55:00")));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let result = AnomalyWindow::new(ts("2014-01-02 00:00:00"), ts("2014-01-01 00:00:00"));
        assert!(matches!(result, Err(DataError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_without_fraction() {
        let window = AnomalyWindow::parse("2014-01-01 00:00:00", "2014-01-01 01:00:00").unwrap();
        assert_eq!(window.end, ts("2014-01-01 01:00:00"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(AnomalyWindow::parse("soon", "2014-01-01 01:00:00").is_err());
    }
}
