//! Calendar group-by reducers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use data_spi::{Reading, Series};
use serde::{Deserialize, Serialize};

/// Calendar field a series is grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarKey {
    Year,
    Month,
    YearMonth,
}

impl CalendarKey {
    /// Key of one reading.
    pub fn key_of(&self, reading: &Reading) -> GroupKey {
        match self {
            CalendarKey::Year => GroupKey::Year(reading.year()),
            CalendarKey::Month => GroupKey::Month(reading.month()),
            CalendarKey::YearMonth => GroupKey::YearMonth(reading.year(), reading.month()),
        }
    }
}

/// Value of a calendar key. Orders chronologically within one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    Year(i32),
    Month(u32),
    YearMonth(i32, u32),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Year(y) => write!(f, "{}", y),
            GroupKey::Month(m) => write!(f, "{}", m),
            GroupKey::YearMonth(y, m) => write!(f, "{}-{:02}", y, m),
        }
    }
}

/// Statistic computed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reduction {
    Count,
    Mean,
    Max,
    Min,
}

impl Reduction {
    /// Short label used in chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            Reduction::Count => "Count",
            Reduction::Mean => "Mean Temperature",
            Reduction::Max => "Max Temperature",
            Reduction::Min => "Min Temperature",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: usize,
    sum: f64,
    max: f64,
    min: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.max = self.max.max(value);
        self.min = self.min.min(value);
    }

    fn finish(&self, reduction: Reduction) -> f64 {
        match reduction {
            Reduction::Count => self.count as f64,
            Reduction::Mean => self.sum / self.count as f64,
            Reduction::Max => self.max,
            Reduction::Min => self.min,
        }
    }
}

fn accumulate(series: &Series, key: CalendarKey) -> BTreeMap<GroupKey, Accumulator> {
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    for reading in series {
        groups
            .entry(key.key_of(reading))
            .or_insert_with(Accumulator::new)
            .push(reading.value);
    }
    groups
}

/// Reduce each calendar group of the series to one statistic.
///
/// Groups are ordered by key; only groups with at least one reading appear.
pub fn group_by(series: &Series, key: CalendarKey, reduction: Reduction) -> BTreeMap<GroupKey, f64> {
    accumulate(series, key)
        .into_iter()
        .map(|(k, acc)| (k, acc.finish(reduction)))
        .collect()
}

/// One stacked layer: a month with one value per year category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedGroup {
    pub name: String,
    pub values: Vec<f64>,
}

/// Year categories with one stacked layer per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedBars {
    pub categories: Vec<String>,
    pub groups: Vec<StackedGroup>,
}

/// Year × month table of a statistic, missing combinations filled with 0.
pub fn stacked_year_month(series: &Series, reduction: Reduction) -> StackedBars {
    let cells = accumulate(series, CalendarKey::YearMonth);

    let mut years = BTreeSet::new();
    let mut months = BTreeSet::new();
    for key in cells.keys() {
        if let GroupKey::YearMonth(y, m) = key {
            years.insert(*y);
            months.insert(*m);
        }
    }

    let groups = months
        .iter()
        .map(|&m| StackedGroup {
            name: m.to_string(),
            values: years
                .iter()
                .map(|&y| {
                    cells
                        .get(&GroupKey::YearMonth(y, m))
                        .map(|acc| acc.finish(reduction))
                        .unwrap_or(0.0)
                })
                .collect(),
        })
        .collect();

    StackedBars {
        categories: years.iter().map(|y| y.to_string()).collect(),
        groups,
    }
}
