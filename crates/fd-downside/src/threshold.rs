//! Threshold classification - which periods fell below the drop threshold.
//!
//! A period breaches when `return < threshold`. The comparison is strict: a
//! return exactly equal to the threshold is not a breach. A threshold of zero
//! therefore flags every negative return.

use crate::{
    DownsideError, Result,
    series::{BreachLabel, ReturnPoint},
};
use serde::Serialize;

/// Label every return period against the threshold.
///
/// The output is aligned one-to-one with `returns`. Any finite threshold is
/// accepted, though drop thresholds are conventionally negative.
///
/// # Errors
/// [`InvalidThreshold`](DownsideError::InvalidThreshold) when the threshold is
/// NaN or infinite.
pub fn classify(returns: &[ReturnPoint], threshold: f64) -> Result<Vec<BreachLabel>> {
    if !threshold.is_finite() {
        return Err(DownsideError::InvalidThreshold(threshold));
    }

    Ok(returns
        .iter()
        .map(|r| BreachLabel {
            date: r.date,
            value: r.value,
            is_breach: r.value < threshold,
        })
        .collect())
}

/// The breaching periods only, in chronological order.
pub fn breach_events(labels: &[BreachLabel]) -> Vec<BreachLabel> {
    labels.iter().filter(|l| l.is_breach).copied().collect()
}

/// Aggregate view of the breach events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreachEventStats {
    /// Number of breaching periods
    pub count: usize,
    /// Lowest breaching return, `None` without events
    pub worst: Option<f64>,
    /// Mean breaching return, `None` without events
    pub mean: Option<f64>,
}

impl BreachEventStats {
    /// Summarize the breaching labels of a classified series.
    pub fn from_labels(labels: &[BreachLabel]) -> Self {
        let values: Vec<f64> = labels
            .iter()
            .filter(|l| l.is_breach)
            .map(|l| l.value)
            .collect();

        if values.is_empty() {
            return Self {
                count: 0,
                worst: None,
                mean: None,
            };
        }

        let worst = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        Self {
            count: values.len(),
            worst: Some(worst),
            mean: Some(mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{returns::period_returns, series::fixtures::monthly};
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn returns_of(values: &[f64]) -> Vec<ReturnPoint> {
        let prices = monthly(&vec![1.0; values.len()]);
        prices
            .iter()
            .zip(values)
            .map(|(p, &value)| ReturnPoint {
                date: p.date,
                value,
            })
            .collect()
    }

    #[test]
    fn test_classify_example_series() {
        let returns = period_returns(&monthly(&[100.0, 110.0, 99.0, 108.9])).unwrap();
        let labels = classify(&returns, -0.05).unwrap();

        let flags: Vec<bool> = labels.iter().map(|l| l.is_breach).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[rstest]
    #[case(-0.05, -0.05, false)]
    #[case(-0.0501, -0.05, true)]
    #[case(-0.01, 0.0, true)]
    #[case(0.0, 0.0, false)]
    #[case(0.02, 0.05, true)]
    fn test_classify_is_strict(#[case] value: f64, #[case] threshold: f64, #[case] expected: bool) {
        let labels = classify(&returns_of(&[value]), threshold).unwrap();
        assert_eq!(labels[0].is_breach, expected);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::NEG_INFINITY)]
    fn test_classify_rejects_non_finite_threshold(#[case] threshold: f64) {
        let err = classify(&returns_of(&[0.1]), threshold).unwrap_err();
        assert!(matches!(err, DownsideError::InvalidThreshold(_)));
    }

    #[test]
    fn test_classify_empty_input() {
        assert!(classify(&[], -0.05).unwrap().is_empty());
    }

    #[test]
    fn test_breach_events_and_stats() {
        let labels = classify(&returns_of(&[-0.2, 0.1, -0.06, -0.01]), -0.05).unwrap();

        let events = breach_events(&labels);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date, labels[0].date);
        assert_eq!(events[1].date, labels[2].date);

        let stats = BreachEventStats::from_labels(&labels);
        assert_eq!(stats.count, 2);
        assert_relative_eq!(stats.worst.unwrap(), -0.2);
        assert_relative_eq!(stats.mean.unwrap(), -0.13, epsilon = 1e-12);
    }

    #[test]
    fn test_stats_without_events() {
        let labels = classify(&returns_of(&[0.01, 0.02]), -0.05).unwrap();
        let stats = BreachEventStats::from_labels(&labels);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.worst, None);
        assert_eq!(stats.mean, None);
    }
}
