//! TickLab Core — indicator engine for daily OHLCV series.
//!
//! This crate contains:
//! - Domain types (bars, column-oriented price series)
//! - Pure indicator transforms: SMA, EMA, stochastic oscillator, MACD
//! - The engine that composes them and reports each output with its offset
//! - TOML configuration for windows and edge-case policies
//! - CSV ingest of provider exports and immutable chart requests
//!
//! Everything is synchronous and allocation-only; the engine performs no I/O.

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod indicators;

pub use config::{ConfigError, IndicatorConfig};
pub use domain::{Bar, PriceSeries};
pub use engine::{compute_indicators, IndicatorEngine};
pub use error::{IndicatorError, Result};
pub use indicator::{Indicator, IndicatorReport, IndicatorSeries};
