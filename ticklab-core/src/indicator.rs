//! Indicator trait, offset-carrying output series, and the report container.
//!
//! Every transform shortens its input from the front: an indicator over `N`
//! days yields `N - offset` values, and `values[0]` belongs to day `offset`
//! on the original axis. Consumers align by offset instead of by NaN padding.

use crate::domain::PriceSeries;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Trait for indicators computed over a whole price series.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "stoch_d_14").
    fn name(&self) -> &str;

    /// Leading days with no defined value. Equals the output offset.
    fn warmup(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// On success the returned series satisfies
    /// `offset == warmup()` and `offset + values.len() == prices.len()`.
    fn compute(&self, prices: &PriceSeries) -> Result<IndicatorSeries>;
}

/// One indicator output positioned on the original day axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    /// Day index at which `values[0]` is plotted.
    pub offset: usize,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn new(name: impl Into<String>, offset: usize, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            offset,
            values,
        }
    }

    /// Build a series whose offset is whatever the transform trimmed from `days`.
    pub fn trimmed_from(name: impl Into<String>, days: usize, values: Vec<f64>) -> Self {
        let offset = days.saturating_sub(values.len());
        Self::new(name, offset, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value plotted at `day`, or `None` during warm-up and past the end.
    pub fn value_at(&self, day: usize) -> Option<f64> {
        day.checked_sub(self.offset)
            .and_then(|k| self.values.get(k).copied())
    }

    /// Full-length column over `days`, NaN during warm-up.
    pub fn padded(&self, days: usize) -> Vec<f64> {
        (0..days)
            .map(|day| self.value_at(day).unwrap_or(f64::NAN))
            .collect()
    }
}

/// Ordered collection of indicator outputs for one price series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    days: usize,
    series: Vec<IndicatorSeries>,
}

impl IndicatorReport {
    pub fn new(days: usize) -> Self {
        Self {
            days,
            series: Vec::new(),
        }
    }

    /// Length of the original day axis.
    pub fn days(&self) -> usize {
        self.days
    }

    /// Insert a series, replacing any earlier series with the same name.
    pub fn insert(&mut self, series: IndicatorSeries) {
        match self.series.iter_mut().find(|s| s.name == series.name) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    /// Get the indicator value at a specific day.
    pub fn get(&self, name: &str, day: usize) -> Option<f64> {
        self.get_series(name).and_then(|s| s.value_at(day))
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&IndicatorSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSeries> {
        self.series.iter()
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
