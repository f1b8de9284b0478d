//! CLI for the fd-downside analytics engine.
//!
//! This binary loads a price history from CSV, resamples it to period-end
//! prices and prints the downside analysis. It is a thin collaborator around
//! the library: all analytics live in `fd-downside`.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fd_downside::{
    AnalysisConfig, Analysis, Analyzer, BreachEventStats, Frequency, PricePoint, frame,
    seasonality, threshold,
};
use std::{fs, io::Read, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Column used when the requested price column is missing.
const FALLBACK_PRICE_COLUMN: &str = "Close";

#[derive(Parser)]
#[command(name = "fd-downside")]
#[command(about = "Downside-risk analytics for a single price series", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary report for a price history
    Analyze {
        #[command(flatten)]
        input: Input,
        /// Emit the full analysis as JSON instead of a report
        #[arg(long)]
        json: bool,
    },
    /// List the periods that breached the threshold
    Events {
        #[command(flatten)]
        input: Input,
    },
    /// Show the year x month return grid and per-month statistics
    Seasonality {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args)]
struct Input {
    /// CSV file with a date column and a price column
    path: PathBuf,
    /// Name of the date column
    #[arg(long, default_value = "Date")]
    date_column: String,
    /// Name of the price column
    #[arg(long, default_value = "Adj Close")]
    price_column: String,
    /// TOML file with analysis settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drop threshold as a proportion, e.g. -0.05 for a 5% drop
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<f64>,
    /// Period frequency
    #[arg(long, value_enum)]
    frequency: Option<FrequencyArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FrequencyArg {
    Monthly,
    Weekly,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => Self::Monthly,
            FrequencyArg::Weekly => Self::Weekly,
        }
    }
}

/// `RUST_LOG`-style directives, falling back to warnings only.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(
            &std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default(),
        ))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { input, json } => {
            let analysis = run(&input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_report(&analysis);
            }
        }
        Commands::Events { input } => print_events(&run(&input)?),
        Commands::Seasonality { input } => print_seasonality(&run(&input)?)?,
    }

    Ok(())
}

/// Load the input file and run the analysis with the merged configuration.
fn run(input: &Input) -> Result<Analysis> {
    let config = load_config(input)?;
    let reader = csv::Reader::from_path(&input.path)
        .with_context(|| format!("failed to open {}", input.path.display()))?;
    let observations = read_prices(reader, &input.date_column, &input.price_column)
        .with_context(|| format!("failed to read {}", input.path.display()))?;
    info!(
        observations = observations.len(),
        threshold = config.threshold,
        frequency = %config.frequency,
        "loaded price history"
    );

    Ok(Analyzer::with_config(config).analyze_observations(&observations)?)
}

/// Config file first, then command-line overrides.
fn load_config(input: &Input) -> Result<AnalysisConfig> {
    let mut config = match &input.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            parse_config(&text)?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(threshold) = input.threshold {
        config.threshold = threshold;
    }
    if let Some(frequency) = input.frequency {
        config.frequency = frequency.into();
    }
    Ok(config)
}

fn parse_config(text: &str) -> Result<AnalysisConfig> {
    toml::from_str(text).context("invalid analysis config")
}

/// Read raw price observations from CSV.
///
/// Dates may carry a time suffix (`2024-01-31 00:00:00-05:00`); only the
/// leading `YYYY-MM-DD` is used. Rows with an empty price are skipped.
fn read_prices<R: Read>(
    mut reader: csv::Reader<R>,
    date_column: &str,
    price_column: &str,
) -> Result<Vec<PricePoint>> {
    let headers = reader.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let Some(date_idx) = find(date_column) else {
        bail!("missing date column '{date_column}'");
    };
    let price_idx = match find(price_column) {
        Some(idx) => idx,
        None => match find(FALLBACK_PRICE_COLUMN) {
            Some(idx) => {
                warn!("column '{price_column}' not found, using '{FALLBACK_PRICE_COLUMN}'");
                idx
            }
            None => bail!("missing price column '{price_column}'"),
        },
    };

    let mut prices = Vec::new();
    let mut skipped = 0usize;
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or_default().trim();
        let raw_price = record.get(price_idx).unwrap_or_default().trim();
        if raw_price.is_empty() {
            skipped += 1;
            continue;
        }

        let date = raw_date
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .with_context(|| format!("row {}: invalid date '{raw_date}'", row + 1))?;
        let price: f64 = raw_price
            .parse()
            .with_context(|| format!("row {}: invalid price '{raw_price}'", row + 1))?;
        prices.push(PricePoint::new(date, price));
    }

    if skipped > 0 {
        warn!(skipped, "skipped rows without a price");
    }
    Ok(prices)
}

fn print_report(analysis: &Analysis) {
    let s = &analysis.summary;

    println!("Downside Summary\n");
    println!("  Periods analyzed:        {}", s.periods);
    println!("  Threshold:               {:.2}%", s.threshold * 100.0);
    println!("  Periods below threshold: {}", s.breach_count);
    println!("  Breach rate:             {:.1}%", s.breach_rate * 100.0);
    println!("  At or above threshold:   {:.1}%", s.non_breach_rate * 100.0);
    println!("  Longest breach streak:   {} periods", s.longest_streak);
    println!("  Longest red streak:      {} periods", s.longest_negative_streak);
    println!("  Max drawdown:            {:.2}%", s.worst_drawdown * 100.0);
    println!("  Current drawdown:        {:.2}%", s.current_drawdown * 100.0);
    println!("  Periods under water:     {}", s.underwater_periods);
    println!("  Mean return:             {:.2}%", s.mean_return * 100.0);
    println!("  Median return:           {:.2}%", s.median_return * 100.0);
    println!("  Worst period:            {:.2}%", s.worst_return * 100.0);
    println!("  Best period:             {:.2}%", s.best_return * 100.0);
    println!("  Volatility:              {}", percent(s.std_dev));
    println!("  Skewness:                {}", decimal(s.skewness));
    println!("  Excess kurtosis:         {}", decimal(s.excess_kurtosis));
    println!("  Sharpe (annualized):     {:.2}", s.sharpe_ratio);

    if !analysis.worst_periods.is_empty() {
        println!("\nWorst periods:");
        for r in &analysis.worst_periods {
            println!("  {}  {:>8.2}%", r.date.format("%Y-%m"), r.value * 100.0);
        }
    }
}

fn print_events(analysis: &Analysis) {
    let events = threshold::breach_events(&analysis.labels);
    let stats = BreachEventStats::from_labels(&analysis.labels);

    if events.is_empty() {
        println!(
            "No periods below the threshold of {:.2}%.",
            analysis.summary.threshold * 100.0
        );
        return;
    }

    println!("Total events: {}", stats.count);
    println!("Worst event:  {}", percent(stats.worst));
    println!("Mean event:   {}\n", percent(stats.mean));
    for event in &events {
        println!("  {}  {:>8.2}%", event.date.format("%Y-%m"), event.value * 100.0);
    }
}

fn print_seasonality(analysis: &Analysis) -> Result<()> {
    println!("{}", frame::seasonality_frame(&analysis.seasonality)?);

    let profile = &analysis.month_profile;
    if let Some(best) = seasonality::best_month(profile) {
        println!("\nBest month:    {} ({:.2}%)", best.name(), best.mean * 100.0);
    }
    if let Some(worst) = seasonality::worst_month(profile) {
        println!("Worst month:   {} ({:.2}%)", worst.name(), worst.mean * 100.0);
    }
    if let Some(volatile) = seasonality::most_volatile_month(profile) {
        println!("Most volatile: {} ({})", volatile.name(), percent(volatile.std_dev));
    }

    println!();
    for month in profile {
        println!(
            "  {:<10} avg {:>7.2}%  std {:>8}  n={}",
            month.name(),
            month.mean * 100.0,
            percent(month.std_dev),
            month.count
        );
    }
    Ok(())
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0))
}

fn decimal(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(data.as_bytes())
    }

    #[test]
    fn test_log_filter_honors_global_level() {
        assert_eq!(log_filter("").max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter("info").max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_read_prices() {
        let data = "Date,Open,Adj Close\n\
                    2024-01-31 00:00:00-05:00,1,100.5\n\
                    2024-02-29,1,\n\
                    2024-03-28,1,101.25\n";
        let prices = read_prices(reader(data), "Date", "Adj Close").unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(prices[1].price, 101.25);
    }

    #[test]
    fn test_read_prices_falls_back_to_close() {
        let data = "Date,Close\n2024-01-31,10\n2024-02-29,11\n";
        let prices = read_prices(reader(data), "Date", "Adj Close").unwrap();
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn test_read_prices_errors() {
        assert!(read_prices(reader("When,Close\n2024-01-31,1\n"), "Date", "Close").is_err());
        assert!(read_prices(reader("Date,Volume\n2024-01-31,1\n"), "Date", "Adj Close").is_err());
        assert!(read_prices(reader("Date,Close\n31/01/2024,1\n"), "Date", "Close").is_err());
        assert!(read_prices(reader("Date,Close\n2024-01-31,abc\n"), "Date", "Close").is_err());
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config("threshold = -0.08\nfrequency = \"weekly\"\n").unwrap();
        assert_eq!(config.threshold, -0.08);
        assert_eq!(config.frequency, Frequency::Weekly);
        assert_eq!(config.top_n_worst, 10);

        assert!(parse_config("threshold = \"low\"").is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "fd-downside",
            "analyze",
            "prices.csv",
            "--threshold",
            "-0.1",
            "--frequency",
            "weekly",
        ]);
        let Commands::Analyze { input, json } = cli.command else {
            panic!("expected analyze command");
        };

        assert!(!json);
        let config = load_config(&input).unwrap();
        assert_eq!(config.threshold, -0.1);
        assert_eq!(config.frequency, Frequency::Weekly);
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(Some(-0.1234)), "-12.34%");
        assert_eq!(percent(None), "n/a");
        assert_eq!(decimal(Some(1.0)), "1.00");
    }
}
