//! Period resampling - collapse raw observations to one price per period.
//!
//! Returns are measured between period-end prices, so daily observations are
//! reduced to the last observation of each month (or week) before any other
//! component runs. Each resampled point is stamped with the period-end date:
//! the last day of the month, or the Sunday that closes the week.

use crate::{
    DownsideError, Result,
    config::Frequency,
    series::{PricePoint, ensure_valid_price},
};
use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::{debug, warn};

/// Period-end date of the period containing `date`.
pub fn period_end(date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
            .checked_add_months(Months::new(1))?
            .pred_opt(),
        Frequency::Weekly => {
            let to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
            date.checked_add_days(Days::new(u64::from(to_sunday)))
        }
    }
}

/// Keep the last observation of each period.
///
/// Observations may arrive in any order; they are sorted by date first. When
/// two observations share a date the later one in the input wins.
///
/// # Errors
/// - [`InsufficientData`](DownsideError::InsufficientData) for an empty input
/// - [`InvalidPrice`](DownsideError::InvalidPrice) for a non-positive or non-finite price
pub fn resample(observations: &[PricePoint], frequency: Frequency) -> Result<Vec<PricePoint>> {
    if observations.is_empty() {
        return Err(DownsideError::InsufficientData {
            required: 1,
            available: 0,
        });
    }
    for point in observations {
        ensure_valid_price(point)?;
    }

    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|p| p.date);

    let mut periods: Vec<PricePoint> = Vec::new();
    let mut last_date: Option<NaiveDate> = None;
    for point in sorted {
        if last_date == Some(point.date) {
            warn!(date = %point.date, "duplicate observation date, keeping the later price");
        }
        last_date = Some(point.date);

        let end = period_end(point.date, frequency)
            .ok_or_else(|| DownsideError::InvalidDate(point.date.to_string()))?;
        let resampled = PricePoint::new(end, point.price);

        match periods.last_mut() {
            Some(current) if current.date == end => *current = resampled,
            _ => periods.push(resampled),
        }
    }

    debug!(
        observations = observations.len(),
        periods = periods.len(),
        %frequency,
        "resampled price observations"
    );
    Ok(periods)
}
