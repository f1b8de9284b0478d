//! Error types for downside analytics.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for downside analytics operations.
pub type Result<T> = std::result::Result<T, DownsideError>;

/// Errors that can occur while analyzing a price series.
#[derive(Debug, Error)]
pub enum DownsideError {
    /// Fewer observations than the computation needs
    #[error("Insufficient data: need {required} points, got {available}")]
    InsufficientData {
        /// Required number of points
        required: usize,
        /// Available number of points
        available: usize,
    },

    /// Non-positive or non-finite price
    #[error("Invalid price {price} on {date}: prices must be positive and finite")]
    InvalidPrice {
        /// Date of the offending observation
        date: NaiveDate,
        /// The offending price
        price: f64,
    },

    /// Two points fall into the same calendar month
    #[error("Duplicate period: more than one point for {year}-{month:02}")]
    DuplicatePeriod {
        /// Calendar year
        year: i32,
        /// Calendar month (1-12)
        month: u32,
    },

    /// Dates are not strictly increasing
    #[error("Unordered periods: {next} does not follow {previous}")]
    UnorderedPeriods {
        /// Date of the earlier point in the sequence
        previous: NaiveDate,
        /// Date of the point that should have come after it
        next: NaiveDate,
    },

    /// Breach threshold is NaN or infinite
    #[error("Invalid threshold: {0} is not a finite number")]
    InvalidThreshold(f64),

    /// Upstream outputs disagree in length
    #[error("Misaligned {component}: expected {expected} periods, got {actual}")]
    Misaligned {
        /// Name of the misaligned component output
        component: &'static str,
        /// Number of return periods
        expected: usize,
        /// Number of periods in the component output
        actual: usize,
    },

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Null cell in a required column
    #[error("Missing value in column {column} at row {row}")]
    MissingValue {
        /// Column name
        column: String,
        /// Zero-based row index
        row: usize,
    },

    /// Date string that is not `YYYY-MM-DD`
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
