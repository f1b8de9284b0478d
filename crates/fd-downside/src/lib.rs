#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/downside/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod drawdown;
pub mod error;
pub mod frame;
pub mod resample;
pub mod returns;
pub mod seasonality;
pub mod series;
pub mod stats;
pub mod streak;
pub mod threshold;

// Re-export core types
pub use analysis::{Analysis, Analyzer};
pub use config::{AnalysisConfig, Frequency};
pub use error::{DownsideError, Result};
pub use returns::period_returns;
pub use seasonality::{MonthProfile, SeasonalityMatrix, YearMonth};
pub use series::{BreachLabel, DrawdownPoint, PricePoint, ReturnPoint, Streak};
pub use stats::{Summary, SummaryInputs};
pub use threshold::BreachEventStats;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
