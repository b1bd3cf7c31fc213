//! TOML-backed run configuration with validation.
//!
//! The file format keeps enumerated options as strings (the natural TOML
//! shape); `resolve()` parses them into the core's closed sum types and is
//! the single place an illegal value can fail — there is no silent
//! defaulting past that point.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use settlelab_core::config::{
    parse_weekday, ConfigError, CountingPeriod, EngineConfig, OpeningPriceCalc, PrevCloseCalc,
};
use thiserror::Error;

/// Errors reading or parsing a config file. Validation failures are the
/// core `ConfigError`.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Serializable configuration for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestSection {
    /// Analysis window, inclusive on both ends (YYYY-MM-DD).
    pub start_date: String,
    pub end_date: String,

    #[serde(default = "default_event_weekday")]
    pub event_weekday: String,
    #[serde(default = "default_counting_period")]
    pub counting_period: String,
    #[serde(default = "default_price_calc")]
    pub opening_price_calc: String,
    #[serde(default = "default_price_calc")]
    pub prev_close_calc: String,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Normalized bar CSV. When absent the caller must opt into synthetic
    /// data explicitly.
    #[serde(default)]
    pub data: Option<PathBuf>,
}

fn default_event_weekday() -> String {
    "wed".to_string()
}

fn default_counting_period() -> String {
    "weekly".to_string()
}

fn default_price_calc() -> String {
    "standard".to_string()
}

fn default_periods_per_year() -> f64 {
    52.0
}

/// Validated form of a `BacktestConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub engine: EngineConfig,
}

impl BacktestConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse every enumerated option and the date window; the first
    /// illegal value aborts with the error naming the valid set.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let section = &self.backtest;

        let start_date = parse_date(&section.start_date)?;
        let end_date = parse_date(&section.end_date)?;
        if start_date > end_date {
            return Err(ConfigError::InvertedDateRange {
                start: start_date,
                end: end_date,
            });
        }

        let engine = EngineConfig {
            event_weekday: parse_weekday(&section.event_weekday)?,
            counting_period: section.counting_period.parse::<CountingPeriod>()?,
            opening_price_calc: section.opening_price_calc.parse::<OpeningPriceCalc>()?,
            prev_close_calc: section.prev_close_calc.parse::<PrevCloseCalc>()?,
            periods_per_year: section.periods_per_year,
        };
        engine.validate()?;

        Ok(ResolvedConfig {
            start_date,
            end_date,
            engine,
        })
    }

    /// Content-addressed run id: two identical configs share an id.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn minimal_toml() -> &'static str {
        r#"
[backtest]
start_date = "2017-05-16"
end_date = "2024-12-31"
"#
    }

    #[test]
    fn minimal_config_resolves_with_defaults() {
        let config = BacktestConfig::from_toml(minimal_toml()).unwrap();
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.engine.event_weekday, Weekday::Wed);
        assert_eq!(resolved.engine.counting_period, CountingPeriod::Weekly);
        assert_eq!(resolved.engine.opening_price_calc, OpeningPriceCalc::Standard);
        assert_eq!(resolved.engine.prev_close_calc, PrevCloseCalc::Standard);
        assert_eq!(resolved.engine.periods_per_year, 52.0);
        assert_eq!(
            resolved.start_date,
            NaiveDate::from_ymd_opt(2017, 5, 16).unwrap()
        );
    }

    #[test]
    fn full_config_parses_every_axis() {
        let toml = r#"
[backtest]
start_date = "2020-01-01"
end_date = "2020-12-31"
event_weekday = "fri"
counting_period = "monthly"
opening_price_calc = "night"
prev_close_calc = "settlement_open"
periods_per_year = 12.0
data = "data/tx_bars.csv"
"#;
        let config = BacktestConfig::from_toml(toml).unwrap();
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.engine.event_weekday, Weekday::Fri);
        assert_eq!(resolved.engine.counting_period, CountingPeriod::Monthly);
        assert_eq!(resolved.engine.opening_price_calc, OpeningPriceCalc::Night);
        assert_eq!(
            resolved.engine.prev_close_calc,
            PrevCloseCalc::SettlementOpen
        );
        assert_eq!(resolved.engine.periods_per_year, 12.0);
        assert_eq!(
            config.backtest.data,
            Some(PathBuf::from("data/tx_bars.csv"))
        );
    }

    #[test]
    fn illegal_price_calc_never_defaults_silently() {
        let toml = r#"
[backtest]
start_date = "2020-01-01"
end_date = "2020-12-31"
prev_close_calc = "midnight"
"#;
        let config = BacktestConfig::from_toml(toml).unwrap();
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedPrevCloseCalc(_)));
        assert!(err.to_string().contains("midnight"));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let toml = r#"
[backtest]
start_date = "2024-12-31"
end_date = "2024-01-01"
"#;
        let config = BacktestConfig::from_toml(toml).unwrap();
        assert!(matches!(
            config.resolve().unwrap_err(),
            ConfigError::InvertedDateRange { .. }
        ));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let toml = r#"
[backtest]
start_date = "16/05/2017"
end_date = "2024-12-31"
"#;
        let config = BacktestConfig::from_toml(toml).unwrap();
        assert!(matches!(
            config.resolve().unwrap_err(),
            ConfigError::InvalidDate(_)
        ));
    }

    #[test]
    fn run_id_is_deterministic_and_parameter_sensitive() {
        let config = BacktestConfig::from_toml(minimal_toml()).unwrap();
        assert_eq!(config.run_id(), config.run_id());

        let mut other = config.clone();
        other.backtest.prev_close_calc = "night".to_string();
        assert_ne!(config.run_id(), other.run_id());
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = BacktestConfig::from_toml(minimal_toml()).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let deser: BacktestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deser);
    }
}
