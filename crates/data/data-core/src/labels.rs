//! Known-window labelling.

use data_api::AnomalyWindow;
use data_spi::Series;

/// One flag per reading: `true` when its timestamp falls in any window.
///
/// Windows are compared chronologically on parsed timestamps, so the result
/// does not depend on how the bounds were formatted.
pub fn label_windows(series: &Series, windows: &[AnomalyWindow]) -> Vec<bool> {
    series
        .iter()
        .map(|r| windows.iter().any(|w| w.contains(r.timestamp)))
        .collect()
}

/// Positions of readings inside any window.
pub fn window_indices(series: &Series, windows: &[AnomalyWindow]) -> Vec<usize> {
    label_windows(series, windows)
        .iter()
        .enumerate()
        .filter_map(|(i, &inside)| if inside { Some(i) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};
    use data_spi::Reading;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn hourly(start: &str, n: usize) -> Series {
        let base = ts(start);
        (0..n)
            .map(|i| Reading::new(base + Duration::hours(i as i64), i as f64))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_label_windows_inclusive_bounds() {
        let series = hourly("2014-01-01 00:00:00", 6);
        let windows = vec![
            AnomalyWindow::new(ts("2014-01-01 01:00:00"), ts("2014-01-01 02:00:00")).unwrap(),
            AnomalyWindow::new(ts("2014-01-01 05:00:00"), ts("2014-01-01 09:00:00")).unwrap(),
        ];
        assert_eq!(
            label_windows(&series, &windows),
            vec![false, true, true, false, false, true]
        );
        assert_eq!(window_indices(&series, &windows), vec![1, 2, 5]);
    }

    #[test]
    fn test_no_windows_labels_nothing() {
        let series = hourly("2014-01-01 00:00:00", 3);
        assert_eq!(label_windows(&series, &[]), vec![false; 3]);
    }
}
