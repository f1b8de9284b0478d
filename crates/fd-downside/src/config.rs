//! Analysis configuration.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Sampling frequency of the analyzed periods.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Calendar months, stamped at month end
    #[default]
    Monthly,
    /// Calendar weeks ending on Sunday
    Weekly,
}

impl Frequency {
    /// Number of periods in a year, used to annualize ratios.
    pub const fn periods_per_year(self) -> f64 {
        match self {
            Self::Monthly => 12.0,
            Self::Weekly => 52.0,
        }
    }
}

/// Configuration for an [`Analyzer`](crate::Analyzer) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Drop threshold as a proportion, e.g. `-0.05` for a 5% drop.
    ///
    /// A period breaches when its return is strictly below this value.
    pub threshold: f64,
    /// Period frequency used when resampling raw observations.
    pub frequency: Frequency,
    /// Number of worst periods to report.
    pub top_n_worst: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: -0.05,
            frequency: Frequency::Monthly,
            top_n_worst: 10,
        }
    }
}

impl AnalysisConfig {
    /// Config with a custom threshold and default everything else.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}
