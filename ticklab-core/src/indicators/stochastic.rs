//! Fast Stochastic Oscillator (%K, %D).
//!
//! For each forward window starting at day `i`:
//! - C = close on the window's last day
//! - L = lowest low, H = highest high over the window
//! - %K = (C - L) / (H - L) * 100
//!
//! %D is the 3-period SMA of %K.
//! Offsets: %K at `window`, %D at `window + 3`.
//!
//! A window with H == L has no defined %K. `DegenerateRangePolicy` decides
//! whether that is an error or the 50.0 placeholder; NaN is never emitted.

use super::check_window;
use super::sma::simple_moving_average;
use crate::domain::PriceSeries;
use crate::error::{IndicatorError, Result};
use crate::indicator::{Indicator, IndicatorSeries};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// SMA window used to smooth %K into %D.
pub const PERCENT_D_WINDOW: usize = 3;

/// %K emitted for a zero-range window under `DegenerateRangePolicy::Midpoint`.
pub const DEGENERATE_PLACEHOLDER: f64 = 50.0;

/// What to do with a window whose highest high equals its lowest low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateRangePolicy {
    /// Fail the whole computation with `IndicatorError::DegenerateRange`.
    #[default]
    Reject,
    /// Emit `DEGENERATE_PLACEHOLDER` for that window.
    Midpoint,
}

/// Both stochastic lines.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticOutput {
    pub percent_k: Vec<f64>,
    pub percent_d: Vec<f64>,
}

/// Compute %K and %D over parallel close/high/low series.
pub fn stochastic_oscillator(
    closes: &[f64],
    highs: &[f64],
    lows: &[f64],
    window: usize,
    policy: DegenerateRangePolicy,
) -> Result<StochasticOutput> {
    let n = closes.len();
    for (series, len) in [("high", highs.len()), ("low", lows.len())] {
        if len != n {
            return Err(IndicatorError::LengthMismatch {
                series,
                expected: n,
                actual: len,
            });
        }
    }
    check_window(n, window)?;

    let mut percent_k = Vec::with_capacity(n - window);
    let mut placeholders = 0usize;

    for i in 0..n - window {
        let end = i + window;
        let close = closes[end - 1];
        let (lowest, highest) = window_range(&lows[i..end], &highs[i..end]);
        let range = highest - lowest;

        let k = if range == 0.0 {
            match policy {
                DegenerateRangePolicy::Reject => {
                    return Err(IndicatorError::DegenerateRange { index: i });
                }
                DegenerateRangePolicy::Midpoint => {
                    placeholders += 1;
                    DEGENERATE_PLACEHOLDER
                }
            }
        } else {
            (close - lowest) / range * 100.0
        };

        if !k.is_finite() {
            return Err(IndicatorError::NumericOverflow {
                indicator: "stochastic",
                index: i,
            });
        }
        percent_k.push(k);
    }

    if placeholders > 0 {
        warn!(
            window,
            placeholders, "zero high-low range, substituted %K placeholder"
        );
    }

    // %K is scanned first so a flat market reports its degenerate window.
    if n < window + PERCENT_D_WINDOW {
        return Err(IndicatorError::InsufficientData {
            indicator: "stochastic",
            required: window + PERCENT_D_WINDOW,
            actual: n,
        });
    }
    let percent_d = simple_moving_average(&percent_k, PERCENT_D_WINDOW)?;
    Ok(StochasticOutput {
        percent_k,
        percent_d,
    })
}

/// Lowest low and highest high of a window. A NaN anywhere poisons both.
fn window_range(lows: &[f64], highs: &[f64]) -> (f64, f64) {
    let mut min_val = f64::INFINITY;
    let mut max_val = f64::NEG_INFINITY;
    for (&low, &high) in lows.iter().zip(highs) {
        if low.is_nan() || high.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        if low < min_val {
            min_val = low;
        }
        if high > max_val {
            max_val = high;
        }
    }
    (min_val, max_val)
}

/// Which stochastic line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    /// Raw %K.
    K,
    /// 3-period SMA of %K.
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    window: usize,
    line: StochasticLine,
    policy: DegenerateRangePolicy,
    name: String,
}

impl Stochastic {
    pub fn percent_k(window: usize) -> Self {
        Self {
            window,
            line: StochasticLine::K,
            policy: DegenerateRangePolicy::default(),
            name: format!("stoch_k_{window}"),
        }
    }

    pub fn percent_d(window: usize) -> Self {
        Self {
            window,
            line: StochasticLine::D,
            policy: DegenerateRangePolicy::default(),
            name: format!("stoch_d_{window}"),
        }
    }

    pub fn with_policy(mut self, policy: DegenerateRangePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        match self.line {
            StochasticLine::K => self.window,
            StochasticLine::D => self.window + PERCENT_D_WINDOW,
        }
    }

    fn compute(&self, prices: &PriceSeries) -> Result<IndicatorSeries> {
        let out = stochastic_oscillator(
            prices.close(),
            prices.high(),
            prices.low(),
            self.window,
            self.policy,
        )?;
        let values = match self.line {
            StochasticLine::K => out.percent_k,
            StochasticLine::D => out.percent_d,
        };
        Ok(IndicatorSeries::new(&self.name, self.warmup(), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn stochastic_known_values() {
        let closes = [10.0, 12.0, 11.0, 14.0, 13.0, 15.0, 16.0];
        let highs = [11.0, 13.0, 12.0, 15.0, 14.0, 16.0, 17.0];
        let lows = [9.0, 10.0, 10.0, 12.0, 12.0, 13.0, 15.0];
        let out =
            stochastic_oscillator(&closes, &highs, &lows, 3, DegenerateRangePolicy::Reject)
                .unwrap();

        assert_eq!(out.percent_k.len(), 4);
        // i=0: C=11, L=9, H=13 → 50
        assert_approx(out.percent_k[0], 50.0, DEFAULT_EPSILON);
        // i=1: C=14, L=10, H=15 → 80
        assert_approx(out.percent_k[1], 80.0, DEFAULT_EPSILON);
        // i=2: C=13, L=10, H=15 → 60
        assert_approx(out.percent_k[2], 60.0, DEFAULT_EPSILON);
        // i=3: C=15, L=12, H=16 → 75
        assert_approx(out.percent_k[3], 75.0, DEFAULT_EPSILON);

        // %D = forward 3-SMA of %K, one value for 4 %K values
        assert_eq!(out.percent_d.len(), 1);
        assert_approx(out.percent_d[0], (50.0 + 80.0 + 60.0) / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn stochastic_flat_market_rejected() {
        let flat = [5.0, 5.0, 5.0, 5.0, 5.0];
        let err = stochastic_oscillator(&flat, &flat, &flat, 3, DegenerateRangePolicy::Reject)
            .unwrap_err();
        assert_eq!(err, IndicatorError::DegenerateRange { index: 0 });
    }

    #[test]
    fn stochastic_short_flat_market_midpoint_lacks_percent_d() {
        let flat = [5.0, 5.0, 5.0, 5.0, 5.0];
        let err = stochastic_oscillator(&flat, &flat, &flat, 3, DegenerateRangePolicy::Midpoint)
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InsufficientData { required: 6, .. }));
    }

    #[test]
    fn stochastic_flat_market_midpoint_placeholder() {
        let flat = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let out = stochastic_oscillator(&flat, &flat, &flat, 3, DegenerateRangePolicy::Midpoint)
            .unwrap();
        assert_eq!(out.percent_k, vec![DEGENERATE_PLACEHOLDER; 3]);
        assert_eq!(out.percent_d, Vec::<f64>::new());
        assert!(out.percent_k.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn stochastic_degenerate_index_points_at_flat_window() {
        let closes = [1.0, 3.0, 2.0, 4.0, 4.0, 4.0, 4.0, 5.0];
        let highs = [2.0, 4.0, 3.0, 4.0, 4.0, 4.0, 4.0, 6.0];
        let lows = [0.5, 2.0, 1.0, 4.0, 4.0, 4.0, 4.0, 4.5];
        let err =
            stochastic_oscillator(&closes, &highs, &lows, 3, DegenerateRangePolicy::Reject)
                .unwrap_err();
        // Window starting at day 3 covers days 3..6, all pinned at 4.0
        assert_eq!(err, IndicatorError::DegenerateRange { index: 3 });
    }

    #[test]
    fn stochastic_length_mismatch() {
        let err = stochastic_oscillator(
            &[1.0, 2.0, 3.0],
            &[1.0, 2.0],
            &[1.0, 2.0, 3.0],
            1,
            DegenerateRangePolicy::Reject,
        )
        .unwrap_err();
        assert_eq!(
            err,
            IndicatorError::LengthMismatch {
                series: "high",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn stochastic_too_short_for_percent_d() {
        let v = [1.0, 2.0, 3.0, 4.0];
        let err =
            stochastic_oscillator(&v, &v, &v, 3, DegenerateRangePolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "stochastic",
                required: 6,
                actual: 4
            }
        );
    }

    #[test]
    fn stochastic_indicator_applies_policy() {
        let prices = make_series(&[5.0; 12]);
        let flat = PriceSeries::new(
            prices.dates().to_vec(),
            prices.close().to_vec(),
            prices.close().to_vec(),
            prices.close().to_vec(),
            prices.close().to_vec(),
            prices.volume().to_vec(),
        )
        .unwrap();

        let strict: Box<dyn Indicator> = Box::new(Stochastic::percent_k(4));
        assert_eq!(
            strict.compute(&flat).unwrap_err(),
            IndicatorError::DegenerateRange { index: 0 }
        );

        let lenient: Box<dyn Indicator> =
            Box::new(Stochastic::percent_d(4).with_policy(DegenerateRangePolicy::Midpoint));
        let d = lenient.compute(&flat).unwrap();
        assert_eq!(d.offset, 7);
        assert_eq!(d.values, vec![DEGENERATE_PLACEHOLDER; 5]);
    }

    #[test]
    fn stochastic_indicator_offsets() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let prices = make_series(&closes);

        let k = Stochastic::percent_k(5).compute(&prices).unwrap();
        let d = Stochastic::percent_d(5).compute(&prices).unwrap();
        assert_eq!(k.name, "stoch_k_5");
        assert_eq!(d.name, "stoch_d_5");
        assert_eq!(k.offset, 5);
        assert_eq!(d.offset, 8);
        assert_eq!(k.offset + k.len(), prices.len());
        assert_eq!(d.offset + d.len(), prices.len());
        assert!(k.values.iter().all(|v| (0.0..=100.0).contains(v)));
    }
}
