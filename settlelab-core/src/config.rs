//! Typed engine configuration — one closed sum type per option axis.
//!
//! The legal values for every axis are fixed at compile time; parsing an
//! unknown string fails with a `ConfigError` naming the valid set, never a
//! silent default.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration failures. Always fatal, raised before any computation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported opening_price_calc '{0}' (expected: standard, night)")]
    UnsupportedOpeningPriceCalc(String),

    #[error("unsupported prev_close_calc '{0}' (expected: standard, night, settlement_open)")]
    UnsupportedPrevCloseCalc(String),

    #[error("unsupported counting_period '{0}' (expected: weekly, monthly)")]
    UnsupportedCountingPeriod(String),

    #[error("unsupported weekday '{0}' (expected: mon..sun)")]
    UnsupportedWeekday(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("start_date {start} is after end_date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("periods_per_year must be positive, got {0}")]
    InvalidPeriodsPerYear(f64),
}

/// Where the opening-day reference price is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningPriceCalc {
    /// Opening day's regular-session open.
    #[default]
    Standard,
    /// Opening day's after-hours open.
    Night,
}

impl OpeningPriceCalc {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpeningPriceCalc::Standard => "standard",
            OpeningPriceCalc::Night => "night",
        }
    }
}

impl FromStr for OpeningPriceCalc {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(OpeningPriceCalc::Standard),
            "night" => Ok(OpeningPriceCalc::Night),
            other => Err(ConfigError::UnsupportedOpeningPriceCalc(other.to_string())),
        }
    }
}

impl fmt::Display for OpeningPriceCalc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the "previous close" side of the trend signal is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrevCloseCalc {
    /// Previous day's regular-session close.
    #[default]
    Standard,
    /// The event day's after-hours close (the night session settles into
    /// the settlement morning).
    Night,
    /// The event day's regular-session open.
    SettlementOpen,
}

impl PrevCloseCalc {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrevCloseCalc::Standard => "standard",
            PrevCloseCalc::Night => "night",
            PrevCloseCalc::SettlementOpen => "settlement_open",
        }
    }
}

impl FromStr for PrevCloseCalc {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(PrevCloseCalc::Standard),
            "night" => Ok(PrevCloseCalc::Night),
            "settlement_open" => Ok(PrevCloseCalc::SettlementOpen),
            other => Err(ConfigError::UnsupportedPrevCloseCalc(other.to_string())),
        }
    }
}

impl fmt::Display for PrevCloseCalc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which event series is replayed: every settlement, or only the monthly
/// expiries. Monthly restricts the series before anchor chaining, so
/// opening days chain monthly-to-monthly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingPeriod {
    #[default]
    Weekly,
    Monthly,
}

impl CountingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountingPeriod::Weekly => "weekly",
            CountingPeriod::Monthly => "monthly",
        }
    }
}

impl FromStr for CountingPeriod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(CountingPeriod::Weekly),
            "monthly" => Ok(CountingPeriod::Monthly),
            other => Err(ConfigError::UnsupportedCountingPeriod(other.to_string())),
        }
    }
}

/// Parse a weekday from its English name or three-letter abbreviation.
pub fn parse_weekday(s: &str) -> Result<Weekday, ConfigError> {
    Weekday::from_str(s).map_err(|_| ConfigError::UnsupportedWeekday(s.to_string()))
}

/// Validated engine configuration for one backtest run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Weekday the settlement falls on (TAIFEX: Wednesday).
    pub event_weekday: Weekday,
    pub counting_period: CountingPeriod,
    pub opening_price_calc: OpeningPriceCalc,
    pub prev_close_calc: PrevCloseCalc,
    /// Event cadence used for risk annualization (52 weekly, 12 monthly).
    pub periods_per_year: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_weekday: Weekday::Wed,
            counting_period: CountingPeriod::Weekly,
            opening_price_calc: OpeningPriceCalc::Standard,
            prev_close_calc: PrevCloseCalc::Standard,
            periods_per_year: 52.0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.periods_per_year > 0.0) {
            return Err(ConfigError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        Ok(())
    }
}
