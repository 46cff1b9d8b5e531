//! TickLab CLI — indicator and chart-request commands over an OHLCV CSV export.
//!
//! Commands:
//! - `compute` — run the indicator engine and write the report as JSON or CSV
//! - `charts` — write the chart requests for an external renderer as JSON

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use ticklab_core::chart::chart_requests;
use ticklab_core::data::{default_range, load_csv, select_range};
use ticklab_core::{IndicatorConfig, IndicatorEngine, IndicatorReport, PriceSeries};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ticklab",
    about = "TickLab CLI — moving averages, stochastic oscillator and MACD for daily bars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every indicator and write the report.
    Compute {
        #[command(flatten)]
        input: InputArgs,

        /// Ticker label for the report. Defaults to the CSV file name.
        #[arg(long)]
        ticker: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write chart requests (open/close, high/low, volume, comprehensive,
    /// stochastic, MACD) as JSON.
    Charts {
        #[command(flatten)]
        input: InputArgs,

        /// Ticker used in chart titles and file names.
        #[arg(long)]
        ticker: String,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct InputArgs {
    /// CSV of daily bars (date,open,high,low,close,volume), oldest first.
    #[arg(long)]
    csv: PathBuf,

    /// Start date (YYYY-MM-DD). Defaults to 365 days before the end date.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to the last bar in the file.
    #[arg(long)]
    end: Option<String>,

    /// Moving-average window in trading days. Overrides the config file.
    #[arg(long)]
    ma_days: Option<usize>,

    /// Stochastic oscillator window in trading days. Overrides the config file.
    #[arg(long)]
    so_days: Option<usize>,

    /// Path to a TOML indicator config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Csv,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute {
            input,
            ticker,
            format,
            output,
        } => run_compute(&input, ticker, format, output.as_deref()),
        Commands::Charts {
            input,
            ticker,
            output,
        } => run_charts(&input, &ticker, output.as_deref()),
    }
}

/// Loaded and range-selected prices with the engine configured for them.
struct Prepared {
    prices: PriceSeries,
    engine: IndicatorEngine,
}

fn prepare(input: &InputArgs) -> Result<Prepared> {
    let bars = load_csv(&input.csv)
        .with_context(|| format!("failed to load bars from {}", input.csv.display()))?;

    let (default_start, default_end) = match default_range(&bars) {
        Some(range) => range,
        None => bail!("{} contains no bars", input.csv.display()),
    };
    let end = parse_date(input.end.as_deref(), "--end")?.unwrap_or(default_end);
    let start = match parse_date(input.start.as_deref(), "--start")? {
        Some(start) => start,
        None if input.end.is_some() => {
            end - chrono::Duration::days(ticklab_core::data::DEFAULT_LOOKBACK_DAYS)
        }
        None => default_start,
    };

    let selected = select_range(&bars, start, end)?;
    let prices = PriceSeries::from_bars(&selected);
    info!(
        %start,
        %end,
        trading_days = prices.len(),
        "loaded price range"
    );

    let config = build_config(input, prices.len())?;
    Ok(Prepared {
        prices,
        engine: IndicatorEngine::new(config),
    })
}

/// File values first, then flag overrides, then a check against the data length.
fn build_config(input: &InputArgs, days: usize) -> Result<IndicatorConfig> {
    let mut config = match &input.config {
        Some(path) => IndicatorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => IndicatorConfig::default(),
    };
    if let Some(ma_days) = input.ma_days {
        config.ma_days = ma_days;
    }
    if let Some(so_days) = input.so_days {
        config.so_days = so_days;
    }
    config.validate_for(days)?;
    Ok(config)
}

fn parse_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("{flag} expects YYYY-MM-DD, got '{s}'"))
        })
        .transpose()
}

fn run_compute(
    input: &InputArgs,
    ticker: Option<String>,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    let Prepared { prices, engine } = prepare(input)?;
    let report = engine.run(&prices)?;
    info!(series = report.len(), "computed indicators");

    let mut out = open_output(output)?;
    match format {
        Format::Json => {
            let ticker = ticker.unwrap_or_else(|| ticker_from_path(&input.csv));
            let (start, end) = prices
                .date_range()
                .map(|(s, e)| (s.to_string(), e.to_string()))
                .unwrap_or_default();
            let document = json!({
                "ticker": ticker,
                "start": start,
                "end": end,
                "config": engine.config(),
                "report": report,
            });
            serde_json::to_writer_pretty(&mut out, &document)?;
            writeln!(out)?;
        }
        Format::Csv => write_report_csv(&mut out, &prices, &report)?,
    }
    out.flush()?;
    Ok(())
}

fn run_charts(input: &InputArgs, ticker: &str, output: Option<&Path>) -> Result<()> {
    let Prepared { prices, engine } = prepare(input)?;
    let report = engine.run(&prices)?;
    let charts = chart_requests(ticker, &prices, &report, &engine);
    info!(charts = charts.len(), "built chart requests");

    let mut out = open_output(output)?;
    serde_json::to_writer_pretty(&mut out, &charts)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn ticker_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// One row per trading day; indicator cells stay empty during warm-up.
fn write_report_csv<W: Write>(
    out: W,
    prices: &PriceSeries,
    report: &IndicatorReport,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["day".to_string(), "date".to_string(), "close".to_string()];
    header.extend(report.iter().map(|s| s.name.clone()));
    writer.write_record(&header)?;

    for (day, (date, close)) in prices.dates().iter().zip(prices.close()).enumerate() {
        let mut row = vec![day.to_string(), date.to_string(), close.to_string()];
        row.extend(
            report
                .iter()
                .map(|s| s.value_at(day).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
