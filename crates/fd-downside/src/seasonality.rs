//! Seasonality - returns reshaped into a sparse year x month matrix.
//!
//! The matrix is sparse on purpose: a month missing from the source series is
//! an absent cell, never a zero return. Producing a dense display grid with
//! explicit "no data" markers is left to the presentation layer (see
//! [`seasonality_frame`](crate::frame::seasonality_frame) for one such grid).

use crate::{
    DownsideError, Result,
    series::{PricePoint, ReturnPoint},
    stats::descriptive::{mean, sample_std},
};
use chrono::Datelike;
use derive_more::Display;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;
use std::ops::RangeInclusive;

/// Calendar month key, ordered chronologically.
///
/// Serializes as its `YYYY-MM` display form so it can key JSON objects.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{year}-{month:02}")]
pub struct YearMonth {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
}

impl YearMonth {
    /// Create a new key.
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Key of the month a date falls in.
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sparse year x month matrix of period returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonalityMatrix {
    cells: BTreeMap<YearMonth, f64>,
}

impl SeasonalityMatrix {
    /// Return for the given month, `None` when the month is absent from the source.
    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        self.cells.get(&YearMonth::new(year, month)).copied()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Populated cells in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, f64)> + '_ {
        self.cells.iter().map(|(key, value)| (*key, *value))
    }

    /// Inclusive range from the first to the last populated year.
    pub fn years(&self) -> Option<RangeInclusive<i32>> {
        let first = self.cells.keys().next()?;
        let last = self.cells.keys().next_back()?;
        Some(first.year..=last.year)
    }
}

/// Build the seasonality matrix from a return series.
///
/// # Errors
/// [`DuplicatePeriod`](DownsideError::DuplicatePeriod) when two returns fall
/// into the same calendar month. The first value is never silently replaced.
pub fn aggregate(returns: &[ReturnPoint]) -> Result<SeasonalityMatrix> {
    let mut cells = BTreeMap::new();

    for point in returns {
        let key = YearMonth::of(&point.date);
        match cells.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(point.value);
            }
            Entry::Occupied(_) => {
                return Err(DownsideError::DuplicatePeriod {
                    year: key.year,
                    month: key.month,
                });
            }
        }
    }

    Ok(SeasonalityMatrix { cells })
}

/// Check that no two prices fall into the same calendar month.
///
/// [`aggregate`] only sees return dates, so a second price inside the seed
/// month would otherwise pass as a monthly return.
///
/// # Errors
/// [`DuplicatePeriod`](DownsideError::DuplicatePeriod) for the first repeated month.
pub fn ensure_distinct_months(prices: &[PricePoint]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for point in prices {
        let key = YearMonth::of(&point.date);
        if !seen.insert(key) {
            return Err(DownsideError::DuplicatePeriod {
                year: key.year,
                month: key.month,
            });
        }
    }
    Ok(())
}

/// Return statistics of one calendar month across all years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthProfile {
    /// Calendar month, 1-12
    pub month: u32,
    /// Mean return of the month
    pub mean: f64,
    /// Sample standard deviation, `None` with a single observation
    pub std_dev: Option<f64>,
    /// Number of years the month was observed
    pub count: usize,
}

impl MonthProfile {
    /// English name of the month.
    pub fn name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok())
            .map_or("Unknown", |m| m.name())
    }
}

/// Per calendar month statistics, for the months present in the series.
///
/// Works on any period frequency: weekly returns are grouped by the month
/// their period ends in.
pub fn month_profile(returns: &[ReturnPoint]) -> Vec<MonthProfile> {
    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for point in returns {
        by_month
            .entry(point.date.month())
            .or_default()
            .push(point.value);
    }

    by_month
        .into_iter()
        .filter_map(|(month, values)| {
            Some(MonthProfile {
                month,
                mean: mean(&values)?,
                std_dev: sample_std(&values),
                count: values.len(),
            })
        })
        .collect()
}

/// Month with the highest mean return.
pub fn best_month(profile: &[MonthProfile]) -> Option<&MonthProfile> {
    profile.iter().max_by(|a, b| a.mean.total_cmp(&b.mean))
}

/// Month with the lowest mean return.
pub fn worst_month(profile: &[MonthProfile]) -> Option<&MonthProfile> {
    profile.iter().min_by(|a, b| a.mean.total_cmp(&b.mean))
}

/// Month with the widest dispersion of returns.
pub fn most_volatile_month(profile: &[MonthProfile]) -> Option<&MonthProfile> {
    profile
        .iter()
        .filter_map(|p| p.std_dev.map(|std| (p, std)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p)
}
