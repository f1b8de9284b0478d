//! Periodic returns - percentage change between consecutive period-end prices.
//!
//! Formula: `R_t = (P_t - P_{t-1}) / P_{t-1}`
//!
//! The first period has no predecessor and therefore no return; it is dropped
//! rather than reported as a zero return.

use crate::{
    Result,
    series::{PricePoint, ReturnPoint, validate_prices},
};

/// Convert a period price series into percentage returns.
///
/// No smoothing and no annualization are applied. The output has one point
/// fewer than the input and carries the dates of every input point but the
/// first.
///
/// # Errors
/// - [`InsufficientData`](crate::DownsideError::InsufficientData) with fewer than two prices
/// - [`InvalidPrice`](crate::DownsideError::InvalidPrice) for a non-positive or non-finite price
/// - [`UnorderedPeriods`](crate::DownsideError::UnorderedPeriods) when dates do not increase
pub fn period_returns(prices: &[PricePoint]) -> Result<Vec<ReturnPoint>> {
    validate_prices(prices, 2)?;

    Ok(prices
        .windows(2)
        .map(|pair| ReturnPoint {
            date: pair[1].date,
            value: (pair[1].price - pair[0].price) / pair[0].price,
        })
        .collect())
}

/// The `n` lowest returns, worst first.
///
/// Equal returns keep their chronological order.
pub fn worst_periods(returns: &[ReturnPoint], n: usize) -> Vec<ReturnPoint> {
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));
    sorted.truncate(n);
    sorted
}
