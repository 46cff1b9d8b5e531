//! Simple Moving Average (SMA).
//!
//! Forward-window mean: output `i` is the mean of `series[i..i + window]`
//! for every start `i` in `0..len - window`. Output length: `len - window`.
//! Plot offset: `window`.
//!
//! Each window is summed from scratch, so every output is the mean of its
//! own window regardless of the magnitudes around it.

use super::check_window;
use crate::domain::PriceSeries;
use crate::error::{IndicatorError, Result};
use crate::indicator::{Indicator, IndicatorSeries};

/// Mean of each forward window of `window` values.
///
/// `window == series.len()` is valid and yields an empty output.
pub fn simple_moving_average(series: &[f64], window: usize) -> Result<Vec<f64>> {
    check_window(series.len(), window)?;

    let n_out = series.len() - window;
    let mut result = Vec::with_capacity(n_out);
    if n_out == 0 {
        return Ok(result);
    }

    let w = window as f64;
    for (i, slice) in series.windows(window).take(n_out).enumerate() {
        let mean = slice.iter().sum::<f64>() / w;
        if !mean.is_finite() {
            return Err(IndicatorError::NumericOverflow {
                indicator: "sma",
                index: i,
            });
        }
        result.push(mean);
    }

    Ok(result)
}

/// SMA of close prices.
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.window
    }

    fn compute(&self, prices: &PriceSeries) -> Result<IndicatorSeries> {
        let values = simple_moving_average(prices.close(), self.window)?;
        Ok(IndicatorSeries::new(&self.name, self.window, values))
    }
}
