//! TradeRecord — one simulated settlement-day trade with its signal context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::EventKind;

/// Direction of the simulated trade. `NoTrade` is produced exactly when the
/// trend indicator is zero; such records stay in the ledger but are excluded
/// from every performance statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Long,
    Short,
    NoTrade,
}

/// One simulated trade keyed to an event date.
///
/// `opening_price` and `previous_close` are the signal inputs resolved under
/// the active price-calculation variants; `entry_price`/`exit_price` are
/// always the event day's own regular-session open/close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub event_date: NaiveDate,
    pub event_kind: EventKind,
    pub opening_day: NaiveDate,
    pub previous_day: NaiveDate,

    pub opening_price: f64,
    pub previous_close: f64,
    pub trend_indicator: f64,
    pub direction: TradeDirection,

    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl_percent: f64,

    // Condition tags for the filter/segmentation engine, all derived from
    // the previous day's regular bar and the event-day open.
    pub prior_candle_bullish: bool,
    pub gapped_up: bool,
    pub body_to_range_ratio: f64,
}

impl TradeRecord {
    /// True for records that entered the market (direction != NoTrade).
    pub fn is_trade(&self) -> bool {
        self.direction != TradeDirection::NoTrade
    }

    pub fn is_winner(&self) -> bool {
        self.pnl_percent > 0.0
    }

    /// Trade return as a fraction (pnl_percent / 100), the unit the risk
    /// metrics operate on.
    pub fn return_fraction(&self) -> f64 {
        self.pnl_percent / 100.0
    }
}

/// Ordered trade ledger, insertion order = chronological event order.
pub type Ledger = Vec<TradeRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> TradeRecord {
        TradeRecord {
            event_date: NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
            event_kind: EventKind::Monthly,
            opening_day: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            previous_day: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
            opening_price: 17_200.0,
            previous_close: 17_450.0,
            trend_indicator: 250.0,
            direction: TradeDirection::Long,
            entry_price: 17_460.0,
            exit_price: 17_530.0,
            pnl_percent: (17_530.0 - 17_460.0) / 17_460.0 * 100.0,
            prior_candle_bullish: true,
            gapped_up: true,
            body_to_range_ratio: 0.6,
        }
    }

    #[test]
    fn trade_flags() {
        let trade = sample_trade();
        assert!(trade.is_trade());
        assert!(trade.is_winner());
    }

    #[test]
    fn no_trade_is_not_a_trade() {
        let mut record = sample_trade();
        record.direction = TradeDirection::NoTrade;
        record.pnl_percent = 0.0;
        assert!(!record.is_trade());
        assert!(!record.is_winner());
    }

    #[test]
    fn return_fraction_matches_percent() {
        let trade = sample_trade();
        assert!((trade.return_fraction() * 100.0 - trade.pnl_percent).abs() < 1e-12);
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.event_date, deser.event_date);
        assert_eq!(trade.direction, deser.direction);
        assert_eq!(trade.pnl_percent, deser.pnl_percent);
    }
}
