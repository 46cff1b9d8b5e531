//! CSV ingest of daily bars exported by a market data provider.
//!
//! Accepts lowercase headers (`date,open,high,low,close,volume`) and the
//! Yahoo Finance export headers (`Date,Open,High,Low,Close,Adj Close,Volume`).
//! Extra columns are ignored. Rows must be strictly ascending by date.

use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Structured error types for data loading.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("line {line}: {date} does not follow {previous} (rows must be oldest first, no duplicates)")]
    OutOfOrder {
        line: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("no bars in input")]
    Empty,

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("no bars between {start} and {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: f64,
}

/// Load bars from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let reader = csv::Reader::from_path(path)?;
    let bars = collect_bars(reader)?;
    debug!(path = %path.display(), bars = bars.len(), "loaded csv");
    Ok(bars)
}

/// Read bars from any CSV source with a header row.
pub fn read_csv<R: Read>(source: R) -> Result<Vec<Bar>, DataError> {
    collect_bars(csv::Reader::from_reader(source))
}

fn collect_bars<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Bar>, DataError> {
    let mut bars: Vec<Bar> = Vec::new();

    for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let bar = to_bar(record?, line)?;

        if let Some(prev) = bars.last() {
            if bar.date <= prev.date {
                return Err(DataError::OutOfOrder {
                    line,
                    date: bar.date,
                    previous: prev.date,
                });
            }
        }
        if !bar.is_sane() {
            warn!(line, date = %bar.date, "bar prices outside the day's high-low range");
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(bars)
}

fn to_bar(row: CsvRow, line: usize) -> Result<Bar, DataError> {
    let invalid = |reason: &str| DataError::InvalidRow {
        line,
        reason: reason.to_string(),
    };

    if [row.open, row.high, row.low, row.close]
        .iter()
        .any(|v| !v.is_finite())
    {
        return Err(invalid("prices must be finite"));
    }
    if !row.volume.is_finite() || row.volume < 0.0 {
        return Err(invalid("volume must be a non-negative number"));
    }

    Ok(Bar {
        date: row.date,
        open: row.open,
        high: row.high,
        low: row.low,
        close: row.close,
        volume: row.volume.round() as u64,
    })
}
