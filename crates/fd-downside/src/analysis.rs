//! End-to-end analysis of one price series.
//!
//! The [`Analyzer`] wires the components together in their data-flow order:
//! returns feed the threshold classifier and the seasonality aggregator, raw
//! prices feed the drawdown tracker, breach labels feed the streak detector,
//! and everything feeds the summarizer. Each call is a pure function of its
//! input and the analyzer's configuration; nothing is cached between calls.

use crate::{
    Result,
    config::{AnalysisConfig, Frequency},
    drawdown,
    resample::resample,
    returns::{period_returns, worst_periods},
    seasonality::{self, MonthProfile, SeasonalityMatrix},
    series::{BreachLabel, DrawdownPoint, PricePoint, ReturnPoint, Streak},
    stats::{Summary, SummaryInputs, summarize},
    streak, threshold,
};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Every derived output for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Period returns
    pub returns: Vec<ReturnPoint>,
    /// Breach labels aligned with `returns`
    pub labels: Vec<BreachLabel>,
    /// Drawdown points aligned with `returns`
    pub drawdowns: Vec<DrawdownPoint>,
    /// Maximal breach streaks
    pub streaks: Vec<Streak>,
    /// Sparse year x month return matrix
    pub seasonality: SeasonalityMatrix,
    /// Per calendar month statistics, over the same calendar-month returns
    /// as `seasonality`
    pub month_profile: Vec<MonthProfile>,
    /// Lowest returns, worst first
    pub worst_periods: Vec<ReturnPoint>,
    /// Scalar summary
    pub summary: Summary,
}

/// Runs the full downside analysis with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with the given configuration.
    pub const fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a series of period-end prices.
    ///
    /// Any component error is returned as is; no partial analysis is produced.
    /// Monthly series with two prices in one calendar month fail with
    /// [`DuplicatePeriod`](crate::DownsideError::DuplicatePeriod), the seed
    /// month included.
    pub fn analyze(&self, prices: &[PricePoint]) -> Result<Analysis> {
        if matches!(self.config.frequency, Frequency::Monthly) {
            seasonality::ensure_distinct_months(prices)?;
        }
        let returns = period_returns(prices)?;
        debug!(periods = returns.len(), "computed period returns");

        let labels = threshold::classify(&returns, self.config.threshold)?;
        let drawdowns = drawdown::track(prices)?;
        let calendar_returns = self.calendar_returns(prices, &returns)?;
        let seasonality = seasonality::aggregate(&calendar_returns)?;
        let month_profile = seasonality::month_profile(&calendar_returns);
        let streaks = streak::detect(&labels);
        debug!(
            streaks = streaks.len(),
            calendar_months = seasonality.len(),
            "classified breaches"
        );

        let summary = summarize(SummaryInputs {
            returns: &returns,
            labels: &labels,
            drawdowns: &drawdowns,
            streaks: &streaks,
            seasonality: &seasonality,
            threshold: self.config.threshold,
            frequency: self.config.frequency,
        })?;
        debug!(
            breach_count = summary.breach_count,
            worst_drawdown = summary.worst_drawdown,
            "summarized series"
        );

        Ok(Analysis {
            month_profile,
            worst_periods: worst_periods(&returns, self.config.top_n_worst),
            returns,
            labels,
            drawdowns,
            streaks,
            seasonality,
            summary,
        })
    }

    /// Calendar-month returns behind the seasonality matrix and the month
    /// profile. Weekly period prices are collapsed to month ends first.
    fn calendar_returns<'a>(
        &self,
        prices: &[PricePoint],
        returns: &'a [ReturnPoint],
    ) -> Result<Cow<'a, [ReturnPoint]>> {
        match self.config.frequency {
            Frequency::Monthly => Ok(Cow::Borrowed(returns)),
            Frequency::Weekly => {
                let month_ends = resample(prices, Frequency::Monthly)?;
                if month_ends.len() < 2 {
                    return Ok(Cow::Owned(Vec::new()));
                }
                Ok(Cow::Owned(period_returns(&month_ends)?))
            }
        }
    }

    /// Resample raw observations to the configured frequency, then analyze.
    pub fn analyze_observations(&self, observations: &[PricePoint]) -> Result<Analysis> {
        let prices = resample(observations, self.config.frequency)?;
        self.analyze(&prices)
    }
}
