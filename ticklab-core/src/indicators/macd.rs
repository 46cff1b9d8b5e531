//! Moving Average Convergence Divergence (MACD) and its signal line.
//!
//! macd[k]   = ema12[k + 14] - ema26[k]   (fast EMA trimmed to the slow EMA's start)
//! signal    = 9-period EMA of macd, seeded per `SignalSeed`
//!
//! Offsets are fixed for any input of at least 35 closes: macd at 26,
//! signal at 35. Both are `closes.len() - line.len()`, the same rule that
//! puts an SMA over `window` days at offset `window`.

use super::ema::{ema_seeded_by_sma, exponential_moving_average};
use super::sma::simple_moving_average;
use crate::domain::PriceSeries;
use crate::error::{IndicatorError, Result};
use crate::indicator::{Indicator, IndicatorSeries};
use serde::{Deserialize, Serialize};

pub const FAST_WINDOW: usize = 12;
pub const SLOW_WINDOW: usize = 26;
pub const SIGNAL_WINDOW: usize = 9;

/// Fewest closes for which both lines are defined.
pub const MIN_LEN: usize = SLOW_WINDOW + SIGNAL_WINDOW;

/// Seed for the signal-line EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSeed {
    /// Seed directly from the first MACD value.
    #[default]
    FirstValue,
    /// Seed from the first 9-period SMA of the MACD line (textbook definition).
    Sma,
}

/// MACD line, signal line, and where each starts on the day axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub macd_offset: usize,
    pub signal_offset: usize,
}

/// Compute MACD(12, 26) and its 9-period signal line.
pub fn macd(closes: &[f64], signal_seed: SignalSeed) -> Result<MacdOutput> {
    let n = closes.len();
    if n < MIN_LEN {
        return Err(IndicatorError::InsufficientData {
            indicator: "macd",
            required: MIN_LEN,
            actual: n,
        });
    }

    let ema_slow = ema_seeded_by_sma(closes, SLOW_WINDOW)?;
    let ema_fast = ema_seeded_by_sma(closes, FAST_WINDOW)?;

    // The fast EMA starts SLOW - FAST days earlier; drop those values.
    let lag = SLOW_WINDOW - FAST_WINDOW;
    let line: Vec<f64> = ema_fast[lag..]
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();

    let seed = match signal_seed {
        SignalSeed::FirstValue => line.first().copied(),
        SignalSeed::Sma => simple_moving_average(&line, SIGNAL_WINDOW)?.first().copied(),
    };
    // No seed means the signal line has no defined values yet.
    let signal = match seed {
        Some(seed) => exponential_moving_average(&line, SIGNAL_WINDOW, seed)?,
        None => Vec::new(),
    };

    Ok(MacdOutput {
        macd_offset: n - line.len(),
        signal_offset: n - signal.len(),
        macd: line,
        signal,
    })
}

/// Which MACD line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    line: MacdLine,
    signal_seed: SignalSeed,
}

impl Macd {
    pub fn line() -> Self {
        Self {
            line: MacdLine::Macd,
            signal_seed: SignalSeed::default(),
        }
    }

    pub fn signal() -> Self {
        Self {
            line: MacdLine::Signal,
            signal_seed: SignalSeed::default(),
        }
    }

    pub fn with_signal_seed(mut self, signal_seed: SignalSeed) -> Self {
        self.signal_seed = signal_seed;
        self
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        match self.line {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "macd_signal",
        }
    }

    fn warmup(&self) -> usize {
        match self.line {
            MacdLine::Macd => SLOW_WINDOW,
            MacdLine::Signal => MIN_LEN,
        }
    }

    fn compute(&self, prices: &PriceSeries) -> Result<IndicatorSeries> {
        let out = macd(prices.close(), self.signal_seed)?;
        let series = match self.line {
            MacdLine::Macd => IndicatorSeries::new(self.name(), out.macd_offset, out.macd),
            MacdLine::Signal => IndicatorSeries::new(self.name(), out.signal_offset, out.signal),
        };
        Ok(series)
    }
}
