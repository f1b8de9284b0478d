//! Conversion between engine types and polars DataFrames.
//!
//! Frames are how the export and chart collaborators consume the engine's
//! output. Dates travel as `YYYY-MM-DD` strings so frames stay readable when
//! printed or written out.

use crate::{
    DownsideError, Result,
    seasonality::SeasonalityMatrix,
    series::{BreachLabel, DrawdownPoint, PricePoint, ReturnPoint, Streak},
};
use chrono::NaiveDate;
use polars::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column names of the seasonality frame, January first.
pub const MONTH_COLUMNS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Read a price series out of a DataFrame.
///
/// # Required Columns
/// - `date_column`: `YYYY-MM-DD` strings
/// - `price_column`: any numeric type castable to `f64`
///
/// Rows are returned in frame order; validating them is left to the
/// components that consume the series.
pub fn prices_from_frame(
    df: &DataFrame,
    date_column: &str,
    price_column: &str,
) -> Result<Vec<PricePoint>> {
    let dates = required_column(df, date_column)?;
    let dates = dates.str()?;
    let prices = required_column(df, price_column)?.cast(&DataType::Float64)?;
    let prices = prices.f64()?;

    dates
        .into_iter()
        .zip(prices)
        .enumerate()
        .map(|(row, (date, price))| {
            let date = date.ok_or_else(|| missing(date_column, row))?;
            let price = price.ok_or_else(|| missing(price_column, row))?;
            Ok(PricePoint::new(parse_date(date)?, price))
        })
        .collect()
}

/// Frame with columns `date`, `return`.
pub fn returns_frame(returns: &[ReturnPoint]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        dates_column("date", returns.iter().map(|r| r.date)),
        Column::new("return".into(), returns.iter().map(|r| r.value).collect::<Vec<_>>()),
    ])?)
}

/// Frame with columns `date`, `return`, `is_breach`.
pub fn labels_frame(labels: &[BreachLabel]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        dates_column("date", labels.iter().map(|l| l.date)),
        Column::new("return".into(), labels.iter().map(|l| l.value).collect::<Vec<_>>()),
        Column::new(
            "is_breach".into(),
            labels.iter().map(|l| l.is_breach).collect::<Vec<_>>(),
        ),
    ])?)
}

/// Frame with columns `date`, `price`, `running_peak`, `drawdown`.
pub fn drawdown_frame(points: &[DrawdownPoint]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        dates_column("date", points.iter().map(|p| p.date)),
        Column::new("price".into(), points.iter().map(|p| p.price).collect::<Vec<_>>()),
        Column::new(
            "running_peak".into(),
            points.iter().map(|p| p.running_peak).collect::<Vec<_>>(),
        ),
        Column::new(
            "drawdown".into(),
            points.iter().map(|p| p.drawdown).collect::<Vec<_>>(),
        ),
    ])?)
}

/// Frame with columns `start`, `end`, `length`.
pub fn streak_frame(streaks: &[Streak]) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        dates_column("start", streaks.iter().map(|s| s.start)),
        dates_column("end", streaks.iter().map(|s| s.end)),
        Column::new(
            "length".into(),
            streaks.iter().map(|s| s.length as u64).collect::<Vec<_>>(),
        ),
    ])?)
}

/// Dense year x month grid of the seasonality matrix.
///
/// One row per year from the first to the last populated year, a `year`
/// column and one column per month named as in [`MONTH_COLUMNS`]. Months
/// absent from the source are null, never zero.
pub fn seasonality_frame(matrix: &SeasonalityMatrix) -> Result<DataFrame> {
    let years: Vec<i32> = matrix
        .years()
        .map(|range| range.collect())
        .unwrap_or_default();

    let mut columns = Vec::with_capacity(MONTH_COLUMNS.len() + 1);
    columns.push(Column::new("year".into(), years.clone()));
    for (month, name) in (1..=12).zip(MONTH_COLUMNS) {
        let cells: Vec<Option<f64>> = years
            .iter()
            .map(|&year| matrix.get(year, month))
            .collect();
        columns.push(Column::new(name.into(), cells));
    }

    Ok(DataFrame::new(columns)?)
}

fn dates_column(name: &str, dates: impl Iterator<Item = NaiveDate>) -> Column {
    let values: Vec<String> = dates.map(|d| d.format(DATE_FORMAT).to_string()).collect();
    Column::new(name.into(), values)
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| DownsideError::MissingColumn(name.to_string()))
}

fn missing(column: &str, row: usize) -> DownsideError {
    DownsideError::MissingValue {
        column: column.to_string(),
        row,
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DownsideError::InvalidDate(value.to_string()))
}
