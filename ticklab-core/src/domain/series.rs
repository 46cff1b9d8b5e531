//! PriceSeries — parallel OHLCV columns for one instrument.

use super::bar::Bar;
use crate::error::{IndicatorError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column-oriented OHLCV data, oldest day first.
///
/// All columns have the same length `N`; day `i` of every column refers to the
/// same trading day. The series is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<u64>,
}

impl PriceSeries {
    /// Build a series from raw columns, rejecting columns of unequal length.
    ///
    /// `dates` may be empty when the caller has no calendar (synthetic data);
    /// otherwise it must match the price columns too.
    pub fn new(
        dates: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<u64>,
    ) -> Result<Self> {
        let expected = close.len();
        check_len("open", expected, open.len())?;
        check_len("high", expected, high.len())?;
        check_len("low", expected, low.len())?;
        check_len("volume", expected, volume.len())?;
        if !dates.is_empty() {
            check_len("dates", expected, dates.len())?;
        }
        Ok(Self {
            dates,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Split a bar slice into columns. Always consistent, so infallible.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let n = bars.len();
        let mut series = Self {
            dates: Vec::with_capacity(n),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
        };
        for bar in bars {
            series.dates.push(bar.date);
            series.open.push(bar.open);
            series.high.push(bar.high);
            series.low.push(bar.low);
            series.close.push(bar.close);
            series.volume.push(bar.volume);
        }
        series
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[u64] {
        &self.volume
    }

    /// Calendar date of a trading day, if dates were supplied.
    pub fn date_at(&self, day: usize) -> Option<NaiveDate> {
        self.dates.get(day).copied()
    }

    /// First and last calendar dates covered.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}

fn check_len(series: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(IndicatorError::LengthMismatch {
            series,
            expected,
            actual,
        })
    }
}
