//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading session a bar belongs to.
///
/// TAIFEX publishes separate rows for the day session and the after-hours
/// session. Single-session datasets carry `Regular` throughout; the
/// after-hours rows only matter for the night-price signal variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Regular,
    AfterHours,
}

/// OHLCV bar for a single trading date and session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub session: Session,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLC sanity check: low <= min(open, close), max(open, close) <= high,
    /// all prices positive and finite.
    pub fn is_sane(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            session: Session::Regular,
            open: 17_500.0,
            high: 17_620.0,
            low: 17_440.0,
            close: 17_580.0,
            volume: 120_000,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = bar.low - 1.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_rejects_nan_price() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_rejects_non_positive_price() {
        let mut bar = sample_bar();
        bar.open = 0.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn session_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Session::AfterHours).unwrap(),
            "\"after_hours\""
        );
        assert_eq!(serde_json::to_string(&Session::Regular).unwrap(), "\"regular\"");
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar.date, deser.date);
        assert_eq!(bar.session, deser.session);
        assert_eq!(bar.close, deser.close);
    }
}
