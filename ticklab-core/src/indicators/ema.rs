//! Exponential Moving Average (EMA).
//!
//! Recursive: ema[k] = alpha * series[window + k] + (1 - alpha) * ema[k - 1]
//! Seed: ema[0] = first SMA value over the same window.
//! Output length and offset match the SMA: `len - window` values at offset `window`.

use super::check_window;
use super::sma::simple_moving_average;
use crate::domain::PriceSeries;
use crate::error::{IndicatorError, Result};
use crate::indicator::{Indicator, IndicatorSeries};

/// Smoothing factor `2 / (window + 1)`.
pub fn smoothing_factor(window: usize) -> f64 {
    2.0 / (window as f64 + 1.0)
}

/// EMA over the same index domain as `simple_moving_average(series, window)`.
///
/// The caller supplies `seed`, normally the first SMA value; the window is
/// not re-checked against the seed's origin. The recursion is strictly
/// sequential, so an error anywhere aborts the whole series.
pub fn exponential_moving_average(series: &[f64], window: usize, seed: f64) -> Result<Vec<f64>> {
    check_window(series.len(), window)?;

    let n_out = series.len() - window;
    if n_out == 0 {
        return Ok(Vec::new());
    }
    if !seed.is_finite() {
        return Err(IndicatorError::NonFiniteSeed { seed });
    }

    let alpha = smoothing_factor(window);
    let mut result = Vec::with_capacity(n_out);
    result.push(seed);

    let mut prev = seed;
    for k in 1..n_out {
        let ema = alpha * series[window + k] + (1.0 - alpha) * prev;
        if !ema.is_finite() {
            return Err(IndicatorError::NumericOverflow {
                indicator: "ema",
                index: k,
            });
        }
        result.push(ema);
        prev = ema;
    }

    Ok(result)
}

/// EMA seeded with the first SMA value of the same window.
pub fn ema_seeded_by_sma(series: &[f64], window: usize) -> Result<Vec<f64>> {
    let sma = simple_moving_average(series, window)?;
    match sma.first() {
        Some(&seed) => exponential_moving_average(series, window, seed),
        None => Ok(Vec::new()),
    }
}

/// EMA of close prices, seeded by the SMA.
#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    name: String,
}

impl Ema {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            name: format!("ema_{window}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.window
    }

    fn compute(&self, prices: &PriceSeries) -> Result<IndicatorSeries> {
        let values = ema_seeded_by_sma(prices.close(), self.window)?;
        Ok(IndicatorSeries::new(&self.name, self.window, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_series, DEFAULT_EPSILON};

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5
        // seed = SMA(10,11,12) = 11.0
        // ema[1] = 0.5*series[4] + 0.5*11.0 = 0.5*14 + 5.5 = 12.5
        // ema[2] = 0.5*series[5] + 0.5*12.5 = 0.5*15 + 6.25 = 13.75
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let result = ema_seeded_by_sma(&closes, 3).unwrap();
        assert_eq!(result.len(), 3);
        assert_approx(result[0], 11.0, DEFAULT_EPSILON);
        assert_approx(result[1], 12.5, DEFAULT_EPSILON);
        assert_approx(result[2], 13.75, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_first_value_is_seed() {
        let closes = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        let result = exponential_moving_average(&closes, 2, 42.0).unwrap();
        assert_eq!(result[0], 42.0);
    }

    #[test]
    fn ema_length_matches_sma() {
        let closes: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        let sma = simple_moving_average(&closes, 7).unwrap();
        let ema = ema_seeded_by_sma(&closes, 7).unwrap();
        assert_eq!(ema.len(), sma.len());
        assert_eq!(ema[0], sma[0]);
    }

    #[test]
    fn ema_smoothing_factor() {
        assert_approx(smoothing_factor(1), 1.0, DEFAULT_EPSILON);
        assert_approx(smoothing_factor(9), 0.2, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_rejects_non_finite_seed() {
        let err = exponential_moving_average(&[1.0, 2.0, 3.0], 1, f64::NAN).unwrap_err();
        assert!(matches!(err, IndicatorError::NonFiniteSeed { .. }));
    }

    #[test]
    fn ema_empty_output_ignores_seed() {
        let result = exponential_moving_average(&[1.0, 2.0], 2, f64::NAN).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn ema_nan_after_seed_is_an_error() {
        let closes = [10.0, 11.0, 12.0, 13.0, f64::NAN, 15.0];
        let err = exponential_moving_average(&closes, 2, 10.5).unwrap_err();
        // window 2: ema[k] reads series[2 + k]; the NaN at day 4 is k = 2
        assert_eq!(
            err,
            IndicatorError::NumericOverflow {
                indicator: "ema",
                index: 2
            }
        );
    }

    #[test]
    fn ema_rejects_invalid_window() {
        assert_eq!(
            exponential_moving_average(&[1.0], 2, 1.0),
            Err(IndicatorError::InvalidWindow { window: 2, len: 1 })
        );
    }

    #[test]
    fn ema_indicator_matches_free_function() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let prices = make_series(&closes);
        let series = Ema::new(3).compute(&prices).unwrap();
        assert_eq!(series.name, "ema_3");
        assert_eq!(series.offset, 3);
        assert_eq!(series.values, ema_seeded_by_sma(&closes, 3).unwrap());
    }
}
