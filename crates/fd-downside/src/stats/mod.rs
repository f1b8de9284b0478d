//! Summary statistics - scalar aggregates over the component outputs.
//!
//! The summarizer never recomputes or patches upstream data. It takes the
//! outputs of the returns, threshold, drawdown, streak and seasonality
//! components as they are, checks that they describe the same periods, and
//! folds them into an immutable [`Summary`].

pub mod descriptive;

use crate::{
    DownsideError, Result,
    config::Frequency,
    drawdown::{max_drawdown, underwater_duration},
    seasonality::SeasonalityMatrix,
    series::{BreachLabel, DrawdownPoint, ReturnPoint, Streak},
    streak, threshold,
};
use descriptive::{excess_kurtosis, mean, median, sample_std, skewness};
use serde::Serialize;

/// Borrowed outputs of the upstream components.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInputs<'a> {
    /// Period returns
    pub returns: &'a [ReturnPoint],
    /// Breach labels aligned with `returns`
    pub labels: &'a [BreachLabel],
    /// Drawdown points aligned with `returns`
    pub drawdowns: &'a [DrawdownPoint],
    /// Breach streaks detected over `labels`
    pub streaks: &'a [Streak],
    /// Seasonality matrix built from `returns`
    pub seasonality: &'a SeasonalityMatrix,
    /// Threshold the labels were classified with
    pub threshold: f64,
    /// Period frequency, used to annualize the Sharpe ratio
    pub frequency: Frequency,
}

/// Scalar downside-risk summary of one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of return periods analyzed
    pub periods: usize,
    /// Drop threshold used for classification
    pub threshold: f64,
    /// Periods with a return strictly below the threshold
    pub breach_count: usize,
    /// `breach_count / periods`
    pub breach_rate: f64,
    /// Share of periods at or above the threshold
    pub non_breach_rate: f64,
    /// Number of breach streaks
    pub streak_count: usize,
    /// Longest run of consecutive breaches, 0 if none
    pub longest_streak: usize,
    /// Longest run of consecutive negative returns, 0 if none
    pub longest_negative_streak: usize,
    /// Deepest drawdown, 0 if the price never fell below its peak
    pub worst_drawdown: f64,
    /// Drawdown of the last period
    pub current_drawdown: f64,
    /// Trailing periods spent below the peak
    pub underwater_periods: usize,
    /// Mean period return
    pub mean_return: f64,
    /// Median period return
    pub median_return: f64,
    /// Lowest period return
    pub worst_return: f64,
    /// Highest period return
    pub best_return: f64,
    /// Sample standard deviation of returns
    pub std_dev: Option<f64>,
    /// Bias-corrected skewness of returns
    pub skewness: Option<f64>,
    /// Bias-corrected excess kurtosis of returns
    pub excess_kurtosis: Option<f64>,
    /// Annualized `mean / std`, 0 without dispersion
    pub sharpe_ratio: f64,
    /// Number of populated seasonality cells
    pub calendar_months: usize,
}

/// Fold the component outputs into a [`Summary`].
///
/// All aggregates cover the full period range supplied, without windowing.
///
/// # Errors
/// - [`InsufficientData`](DownsideError::InsufficientData) when there are no returns
/// - [`Misaligned`](DownsideError::Misaligned) when labels or drawdowns do not
///   cover exactly the return periods
pub fn summarize(inputs: SummaryInputs<'_>) -> Result<Summary> {
    let SummaryInputs {
        returns,
        labels,
        drawdowns,
        streaks,
        seasonality,
        threshold,
        frequency,
    } = inputs;

    if returns.is_empty() {
        return Err(DownsideError::InsufficientData {
            required: 1,
            available: 0,
        });
    }
    ensure_aligned("breach labels", returns.len(), labels.len())?;
    ensure_aligned("drawdowns", returns.len(), drawdowns.len())?;

    let values: Vec<f64> = returns.iter().map(|r| r.value).collect();
    let periods = values.len();

    let breach_count = labels.iter().filter(|l| l.is_breach).count();
    let breach_rate = breach_count as f64 / periods as f64;

    let negative = threshold::classify(returns, 0.0)?;
    let longest_negative_streak = streak::longest(&streak::detect(&negative));

    let mean_return = mean(&values).unwrap_or_default();
    let std_dev = sample_std(&values);
    let sharpe_ratio = match std_dev {
        Some(std) if std > 0.0 => mean_return / std * frequency.periods_per_year().sqrt(),
        _ => 0.0,
    };

    Ok(Summary {
        periods,
        threshold,
        breach_count,
        breach_rate,
        non_breach_rate: 1.0 - breach_rate,
        streak_count: streaks.len(),
        longest_streak: streak::longest(streaks),
        longest_negative_streak,
        worst_drawdown: max_drawdown(drawdowns),
        current_drawdown: drawdowns.last().map_or(0.0, |p| p.drawdown),
        underwater_periods: underwater_duration(drawdowns),
        mean_return,
        median_return: median(&values).unwrap_or_default(),
        worst_return: values.iter().copied().fold(f64::INFINITY, f64::min),
        best_return: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        std_dev,
        skewness: skewness(&values),
        excess_kurtosis: excess_kurtosis(&values),
        sharpe_ratio,
        calendar_months: seasonality.len(),
    })
}

fn ensure_aligned(component: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(DownsideError::Misaligned {
            component,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{drawdown, returns::period_returns, seasonality, series::fixtures::monthly};
    use approx::assert_relative_eq;

    struct Outputs {
        returns: Vec<ReturnPoint>,
        labels: Vec<BreachLabel>,
        drawdowns: Vec<DrawdownPoint>,
        streaks: Vec<Streak>,
        seasonality: SeasonalityMatrix,
    }

    fn outputs(prices: &[f64], threshold: f64) -> Outputs {
        let prices = monthly(prices);
        let returns = period_returns(&prices).unwrap();
        let labels = threshold::classify(&returns, threshold).unwrap();
        let streaks = streak::detect(&labels);
        Outputs {
            drawdowns: drawdown::track(&prices).unwrap(),
            seasonality: seasonality::aggregate(&returns).unwrap(),
            returns,
            labels,
            streaks,
        }
    }

    fn inputs(outputs: &Outputs, threshold: f64) -> SummaryInputs<'_> {
        SummaryInputs {
            returns: &outputs.returns,
            labels: &outputs.labels,
            drawdowns: &outputs.drawdowns,
            streaks: &outputs.streaks,
            seasonality: &outputs.seasonality,
            threshold,
            frequency: Frequency::Monthly,
        }
    }

    #[test]
    fn test_summary_example_series() {
        let out = outputs(&[100.0, 110.0, 99.0, 108.9], -0.05);
        let summary = summarize(inputs(&out, -0.05)).unwrap();

        assert_eq!(summary.periods, 3);
        assert_eq!(summary.breach_count, 1);
        assert_relative_eq!(summary.breach_rate, 1.0 / 3.0);
        assert_relative_eq!(summary.non_breach_rate, 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(summary.longest_streak, 1);
        assert_eq!(summary.streak_count, 1);
        assert_relative_eq!(summary.worst_drawdown, -0.10, epsilon = 1e-12);
        assert_relative_eq!(summary.current_drawdown, -0.01, epsilon = 1e-12);
        assert_eq!(summary.underwater_periods, 2);
        assert_relative_eq!(summary.mean_return, 0.10 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(summary.median_return, 0.10, epsilon = 1e-12);
        assert_relative_eq!(summary.worst_return, -0.10, epsilon = 1e-12);
        assert_eq!(summary.calendar_months, 3);
    }

    #[test]
    fn test_increasing_series() {
        let out = outputs(&[100.0, 101.0, 103.0, 110.0, 111.0], -0.05);
        let summary = summarize(inputs(&out, -0.05)).unwrap();

        assert_eq!(summary.worst_drawdown, 0.0);
        assert_eq!(summary.longest_streak, 0);
        assert_eq!(summary.longest_negative_streak, 0);
        assert_eq!(summary.breach_count, 0);
        assert!(summary.sharpe_ratio > 0.0);
    }

    #[test]
    fn test_negative_streak_ignores_threshold() {
        // -4%, -6.25%, -2.2%: negative every period, a single breach.
        let out = outputs(&[100.0, 96.0, 90.0, 88.0], -0.05);
        let summary = summarize(inputs(&out, -0.05)).unwrap();

        assert_eq!(summary.longest_negative_streak, 3);
        assert_eq!(summary.longest_streak, 1);
    }

    #[test]
    fn test_empty_returns_fail() {
        let matrix = SeasonalityMatrix::default();
        let err = summarize(SummaryInputs {
            returns: &[],
            labels: &[],
            drawdowns: &[],
            streaks: &[],
            seasonality: &matrix,
            threshold: -0.05,
            frequency: Frequency::Monthly,
        })
        .unwrap_err();
        assert!(matches!(err, DownsideError::InsufficientData { .. }));
    }

    #[test]
    fn test_misaligned_drawdowns_fail() {
        let out = outputs(&[100.0, 90.0, 95.0], -0.05);
        let mut input = inputs(&out, -0.05);
        input.drawdowns = &out.drawdowns[1..];

        let err = summarize(input).unwrap_err();
        assert!(matches!(
            err,
            DownsideError::Misaligned {
                component: "drawdowns",
                expected: 2,
                actual: 1
            }
        ));
    }
}
