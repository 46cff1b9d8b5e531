//! Serializable indicator configuration.
//!
//! Parsed from TOML, e.g.:
//!
//! ```toml
//! ma_days = 20
//! so_days = 14
//! degenerate_range = "midpoint"
//! signal_seed = "sma"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use crate::indicators::macd::MIN_LEN as MACD_MIN_LEN;
use crate::indicators::stochastic::PERCENT_D_WINDOW;
use crate::indicators::{DegenerateRangePolicy, SignalSeed};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MA_DAYS: usize = 20;
pub const DEFAULT_SO_DAYS: usize = 14;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{field} must be at least 1")]
    InvalidWindow { field: &'static str },

    #[error("{field} = {value} needs more than {days} trading days (limit {limit})")]
    WindowTooLong {
        field: &'static str,
        value: usize,
        days: usize,
        limit: usize,
    },

    #[error("{indicator} needs at least {required} trading days, range has {days}")]
    TooFewDays {
        indicator: &'static str,
        required: usize,
        days: usize,
    },
}

/// Window sizes and edge-case policies for one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Window for the SMA and EMA.
    pub ma_days: usize,

    /// Window for the stochastic oscillator.
    pub so_days: usize,

    /// Zero high-low range handling in the stochastic oscillator.
    pub degenerate_range: DegenerateRangePolicy,

    /// Seed for the MACD signal line.
    pub signal_seed: SignalSeed,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_days: DEFAULT_MA_DAYS,
            so_days: DEFAULT_SO_DAYS,
            degenerate_range: DegenerateRangePolicy::default(),
            signal_seed: SignalSeed::default(),
        }
    }
}

impl IndicatorConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject zero windows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ma_days == 0 {
            return Err(ConfigError::InvalidWindow { field: "ma_days" });
        }
        if self.so_days == 0 {
            return Err(ConfigError::InvalidWindow { field: "so_days" });
        }
        Ok(())
    }

    /// Check the windows against the number of trading days available.
    ///
    /// The moving-average window must leave at least one output day, the
    /// oscillator window must leave room for %D's 3-day smoothing, and the
    /// range must cover MACD's fixed 26 + 9 day warm-up.
    pub fn validate_for(&self, days: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if self.ma_days >= days {
            return Err(ConfigError::WindowTooLong {
                field: "ma_days",
                value: self.ma_days,
                days,
                limit: days.saturating_sub(1),
            });
        }
        if self.so_days + PERCENT_D_WINDOW > days {
            return Err(ConfigError::WindowTooLong {
                field: "so_days",
                value: self.so_days,
                days,
                limit: days.saturating_sub(PERCENT_D_WINDOW),
            });
        }
        if days < MACD_MIN_LEN {
            return Err(ConfigError::TooFewDays {
                indicator: "macd",
                required: MACD_MIN_LEN,
                days,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = IndicatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, IndicatorConfig::default());
        assert_eq!(config.degenerate_range, DegenerateRangePolicy::Reject);
        assert_eq!(config.signal_seed, SignalSeed::FirstValue);
    }

    #[test]
    fn full_toml_parses() {
        let config = IndicatorConfig::from_toml_str(
            r#"
ma_days = 10
so_days = 5
degenerate_range = "midpoint"
signal_seed = "sma"
"#,
        )
        .unwrap();
        assert_eq!(config.ma_days, 10);
        assert_eq!(config.so_days, 5);
        assert_eq!(config.degenerate_range, DegenerateRangePolicy::Midpoint);
        assert_eq!(config.signal_seed, SignalSeed::Sma);
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let err = IndicatorConfig::from_toml_str(r#"degenerate_range = "ignore""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_window_rejected() {
        let err = IndicatorConfig::from_toml_str("ma_days = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWindow { field: "ma_days" }));
    }

    #[test]
    fn validate_for_day_count() {
        let config = IndicatorConfig {
            ma_days: 40,
            so_days: 14,
            ..Default::default()
        };
        assert!(config.validate_for(41).is_ok());
        assert!(matches!(
            config.validate_for(40),
            Err(ConfigError::WindowTooLong { field: "ma_days", .. })
        ));

        let config = IndicatorConfig {
            ma_days: 5,
            so_days: 40,
            ..Default::default()
        };
        assert!(config.validate_for(43).is_ok());
        assert!(matches!(
            config.validate_for(42),
            Err(ConfigError::WindowTooLong { field: "so_days", .. })
        ));
    }

    #[test]
    fn validate_for_requires_macd_warmup() {
        let config = IndicatorConfig {
            ma_days: 5,
            so_days: 5,
            ..Default::default()
        };
        assert!(config.validate_for(35).is_ok());
        let err = config.validate_for(30).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooFewDays {
                indicator: "macd",
                required: 35,
                days: 30
            }
        ));
        assert!(err.to_string().contains("macd"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticklab.toml");
        std::fs::write(&path, "ma_days = 7\n").unwrap();
        let config = IndicatorConfig::load(&path).unwrap();
        assert_eq!(config.ma_days, 7);
        assert_eq!(config.so_days, DEFAULT_SO_DAYS);
    }
}
