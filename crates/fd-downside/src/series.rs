//! Core series types shared by every component.
//!
//! A [`PricePoint`] sequence is the only input of the engine. Every other type
//! here is derived from it and carries the date of the period it describes, so
//! outputs of different components can be lined up period by period.

use crate::{DownsideError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Period-end price of the analyzed asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Period-end date
    pub date: NaiveDate,
    /// Price, strictly positive
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Percentage change between a period and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPoint {
    /// Date of the period the return ends in
    pub date: NaiveDate,
    /// `(p[t] - p[t-1]) / p[t-1]`
    pub value: f64,
}

/// A return period tagged as breaching or not breaching the drop threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreachLabel {
    /// Period date
    pub date: NaiveDate,
    /// Period return
    pub value: f64,
    /// `value < threshold`
    pub is_breach: bool,
}

/// Drawdown state at the end of a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawdownPoint {
    /// Period date
    pub date: NaiveDate,
    /// Price at the end of the period
    pub price: f64,
    /// Highest price seen so far, current period included
    pub running_peak: f64,
    /// `price / running_peak - 1`, never positive
    pub drawdown: f64,
}

/// A maximal run of consecutive breaching periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    /// First breaching period of the run
    pub start: NaiveDate,
    /// Last breaching period of the run
    pub end: NaiveDate,
    /// Number of periods in the run (at least 1)
    pub length: usize,
}

/// Check the structural contract of a price sequence.
///
/// Fails with [`DownsideError::InsufficientData`] when fewer than `required`
/// points are supplied, [`DownsideError::InvalidPrice`] for a non-positive or
/// non-finite price and [`DownsideError::UnorderedPeriods`] when dates are not
/// strictly increasing. The first violation wins.
pub fn validate_prices(prices: &[PricePoint], required: usize) -> Result<()> {
    if prices.len() < required {
        return Err(DownsideError::InsufficientData {
            required,
            available: prices.len(),
        });
    }

    for point in prices {
        ensure_valid_price(point)?;
    }

    for pair in prices.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(DownsideError::UnorderedPeriods {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
    }

    Ok(())
}

pub(crate) fn ensure_valid_price(point: &PricePoint) -> Result<()> {
    if point.price.is_finite() && point.price > 0.0 {
        Ok(())
    } else {
        Err(DownsideError::InvalidPrice {
            date: point.date,
            price: point.price,
        })
    }
}
