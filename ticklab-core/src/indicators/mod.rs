//! Concrete indicator implementations.
//!
//! Each indicator is a pure free function over `f64` slices, plus a thin
//! `Indicator` wrapper that reads the right columns of a `PriceSeries`.
//! Composition runs in dependency order: SMA seeds EMA, SMA smooths %K
//! into %D, and MACD is built from two EMAs and an EMA of itself.
//!
//! Multi-series indicators (stochastic, MACD) are exposed as separate named
//! instances per line, keeping the single-series `Indicator` trait unchanged.

pub mod ema;
pub mod macd;
pub mod sma;
pub mod stochastic;

pub use ema::{ema_seeded_by_sma, exponential_moving_average, smoothing_factor, Ema};
pub use macd::{macd, Macd, MacdLine, MacdOutput, SignalSeed};
pub use sma::{simple_moving_average, Sma};
pub use stochastic::{
    stochastic_oscillator, DegenerateRangePolicy, Stochastic, StochasticLine, StochasticOutput,
};

use crate::error::{IndicatorError, Result};

/// Reject a window of zero or one longer than the series.
pub(crate) fn check_window(len: usize, window: usize) -> Result<()> {
    if window == 0 || window > len {
        return Err(IndicatorError::InvalidWindow { window, len });
    }
    Ok(())
}

/// Create a synthetic price series from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first day),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::PriceSeries {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect();
    crate::domain::PriceSeries::from_bars(&bars)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
