//! Indicator engine: runs every configured indicator over one price series.
//!
//! Indicators are composed in dependency order so shared intermediates are
//! computed once: the SMA seeds the EMA, one stochastic pass yields both %K
//! and %D, one MACD pass yields both lines. All outputs land in an
//! `IndicatorReport` with their day-axis offsets.

use crate::config::IndicatorConfig;
use crate::domain::PriceSeries;
use crate::error::Result;
use crate::indicator::{Indicator, IndicatorReport, IndicatorSeries};
use crate::indicators::macd::MIN_LEN as MACD_MIN_LEN;
use crate::indicators::stochastic::PERCENT_D_WINDOW;
use crate::indicators::{
    exponential_moving_average, macd, simple_moving_average, stochastic_oscillator,
};
use tracing::debug;

/// Runs the fixed indicator set for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Report name of the SMA series.
    pub fn sma_name(&self) -> String {
        format!("sma_{}", self.config.ma_days)
    }

    /// Report name of the EMA series.
    pub fn ema_name(&self) -> String {
        format!("ema_{}", self.config.ma_days)
    }

    /// Report name of the %K series.
    pub fn percent_k_name(&self) -> String {
        format!("stoch_k_{}", self.config.so_days)
    }

    /// Report name of the %D series.
    pub fn percent_d_name(&self) -> String {
        format!("stoch_d_{}", self.config.so_days)
    }

    /// Longest warm-up across every series the engine produces.
    pub fn warmup(&self) -> usize {
        self.config
            .ma_days
            .max(self.config.so_days + PERCENT_D_WINDOW)
            .max(MACD_MIN_LEN)
    }

    /// Compute every indicator. Fails on the first error; no partial report.
    pub fn run(&self, prices: &PriceSeries) -> Result<IndicatorReport> {
        let days = prices.len();
        let closes = prices.close();
        let mut report = IndicatorReport::new(days);

        let ma_days = self.config.ma_days;
        let sma = simple_moving_average(closes, ma_days)?;
        let ema = match sma.first() {
            Some(&seed) => exponential_moving_average(closes, ma_days, seed)?,
            None => Vec::new(),
        };
        insert(
            &mut report,
            IndicatorSeries::trimmed_from(self.sma_name(), days, sma),
        );
        insert(
            &mut report,
            IndicatorSeries::trimmed_from(self.ema_name(), days, ema),
        );

        let stoch = stochastic_oscillator(
            closes,
            prices.high(),
            prices.low(),
            self.config.so_days,
            self.config.degenerate_range,
        )?;
        insert(
            &mut report,
            IndicatorSeries::trimmed_from(self.percent_k_name(), days, stoch.percent_k),
        );
        insert(
            &mut report,
            IndicatorSeries::trimmed_from(self.percent_d_name(), days, stoch.percent_d),
        );

        let m = macd(closes, self.config.signal_seed)?;
        insert(&mut report, IndicatorSeries::new("macd", m.macd_offset, m.macd));
        insert(
            &mut report,
            IndicatorSeries::new("macd_signal", m.signal_offset, m.signal),
        );

        Ok(report)
    }
}

/// Run the engine for one configuration.
pub fn compute_indicators(
    prices: &PriceSeries,
    config: &IndicatorConfig,
) -> Result<IndicatorReport> {
    IndicatorEngine::new(*config).run(prices)
}

/// Compute an arbitrary set of indicators into one report.
pub fn precompute(
    prices: &PriceSeries,
    indicators: &[Box<dyn Indicator>],
) -> Result<IndicatorReport> {
    let mut report = IndicatorReport::new(prices.len());
    for indicator in indicators {
        let series = indicator.compute(prices)?;
        debug_assert_eq!(
            series.offset,
            indicator.warmup(),
            "indicator '{}' reported offset {} but warmup {}",
            indicator.name(),
            series.offset,
            indicator.warmup()
        );
        insert(&mut report, series);
    }
    Ok(report)
}

/// Maximum warm-up across a set of indicators.
pub fn compute_warmup(indicators: &[Box<dyn Indicator>]) -> usize {
    indicators.iter().map(|i| i.warmup()).max().unwrap_or(0)
}

fn insert(report: &mut IndicatorReport, series: IndicatorSeries) {
    debug_assert_eq!(
        series.offset + series.len(),
        report.days(),
        "indicator '{}' does not end on the last day",
        series.name
    );
    debug!(
        indicator = %series.name,
        offset = series.offset,
        len = series.len(),
        "computed indicator"
    );
    report.insert(series);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use crate::indicators::{make_series, Ema, Macd, Sma, Stochastic};

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.25).sin() * 6.0).collect()
    }

    #[test]
    fn run_produces_all_six_series() {
        let prices = make_series(&closes(60));
        let config = IndicatorConfig {
            ma_days: 10,
            so_days: 5,
            ..Default::default()
        };
        let report = compute_indicators(&prices, &config).unwrap();
        let names: Vec<&str> = report.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["sma_10", "ema_10", "stoch_k_5", "stoch_d_5", "macd", "macd_signal"]
        );
        let offsets: Vec<usize> = report.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![10, 10, 5, 8, 26, 35]);
    }

    #[test]
    fn run_matches_individual_indicators() {
        let prices = make_series(&closes(50));
        let config = IndicatorConfig {
            ma_days: 7,
            so_days: 4,
            ..Default::default()
        };
        let report = compute_indicators(&prices, &config).unwrap();

        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Sma::new(7)),
            Box::new(Ema::new(7)),
            Box::new(Stochastic::percent_k(4)),
            Box::new(Stochastic::percent_d(4)),
            Box::new(Macd::line()),
            Box::new(Macd::signal()),
        ];
        let individual = precompute(&prices, &indicators).unwrap();
        assert_eq!(report, individual);
    }

    #[test]
    fn run_fails_without_partial_report() {
        let prices = make_series(&closes(30));
        let err = compute_indicators(&prices, &IndicatorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::InsufficientData {
                indicator: "macd",
                ..
            }
        ));
    }

    #[test]
    fn engine_warmup_is_longest_offset() {
        let engine = IndicatorEngine::new(IndicatorConfig {
            ma_days: 50,
            so_days: 14,
            ..Default::default()
        });
        assert_eq!(engine.warmup(), 50);
        assert_eq!(IndicatorEngine::new(IndicatorConfig::default()).warmup(), 35);
    }

    #[test]
    fn compute_warmup_over_indicator_list() {
        let indicators: Vec<Box<dyn Indicator>> =
            vec![Box::new(Sma::new(3)), Box::new(Stochastic::percent_d(14))];
        assert_eq!(compute_warmup(&indicators), 17);
        assert_eq!(compute_warmup(&[]), 0);
    }
}
