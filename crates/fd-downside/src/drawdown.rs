//! Drawdown tracking - decline of the price from its running peak.
//!
//! Drawdown is computed on raw prices rather than compounded returns, so no
//! rounding error accumulates along the series.
//!
//! Formula: `DD_t = P_t / max(P_0..=P_t) - 1`
//!
//! The first price only seeds the peak. The output is aligned with the return
//! periods and starts at the second price.

use crate::{
    Result,
    series::{DrawdownPoint, PricePoint, validate_prices},
};

/// Compute the running peak and drawdown for every return period.
///
/// The peak is monotonically non-decreasing: once set, it only moves up when a
/// higher price is observed, at which point the drawdown resets to zero.
///
/// # Errors
/// Same contract as [`period_returns`](crate::period_returns): at least two
/// strictly positive prices with strictly increasing dates.
pub fn track(prices: &[PricePoint]) -> Result<Vec<DrawdownPoint>> {
    validate_prices(prices, 2)?;

    let mut running_peak = prices[0].price;
    Ok(prices[1..]
        .iter()
        .map(|point| {
            running_peak = running_peak.max(point.price);
            DrawdownPoint {
                date: point.date,
                price: point.price,
                running_peak,
                drawdown: point.price / running_peak - 1.0,
            }
        })
        .collect())
}

/// Deepest drawdown of the series, `0.0` if the price never fell below its peak.
pub fn max_drawdown(points: &[DrawdownPoint]) -> f64 {
    points.iter().map(|p| p.drawdown).fold(0.0, f64::min)
}

/// Number of trailing periods spent below the peak.
///
/// Zero when the last period sits on a peak.
pub fn underwater_duration(points: &[DrawdownPoint]) -> usize {
    points.iter().rev().take_while(|p| p.drawdown < 0.0).count()
}

/// Longest run of consecutive periods spent below the peak.
pub fn longest_underwater(points: &[DrawdownPoint]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for point in points {
        if point.drawdown < 0.0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
