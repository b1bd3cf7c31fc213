//! Signal computation and same-day trade simulation for one event.
//!
//! The price-calc variants only affect the *signal* inputs; trade entry and
//! exit always use the event day's own regular-session open/close.

use chrono::NaiveDate;

use crate::config::{OpeningPriceCalc, PrevCloseCalc};
use crate::data::BarTable;
use crate::domain::{EventDate, Session, TradeDirection, TradeRecord};

/// Simulate the event-day trade, or `None` when any required bar is missing
/// (the event is then absent from the ledger — no partial records).
pub fn simulate(
    event: &EventDate,
    opening_day: NaiveDate,
    previous_day: NaiveDate,
    table: &BarTable,
    opening_calc: OpeningPriceCalc,
    prev_calc: PrevCloseCalc,
) -> Option<TradeRecord> {
    let opening_price = match opening_calc {
        OpeningPriceCalc::Standard => table.bar(opening_day, Session::Regular)?.open,
        OpeningPriceCalc::Night => table.bar(opening_day, Session::AfterHours)?.open,
    };
    let previous_close = match prev_calc {
        PrevCloseCalc::Standard => table.bar(previous_day, Session::Regular)?.close,
        PrevCloseCalc::Night => table.bar(event.date, Session::AfterHours)?.close,
        PrevCloseCalc::SettlementOpen => table.bar(event.date, Session::Regular)?.open,
    };

    let event_bar = table.bar(event.date, Session::Regular)?;
    let prev_bar = table.bar(previous_day, Session::Regular)?;

    let trend_indicator = previous_close - opening_price;
    let (direction, pnl_percent) = if trend_indicator > 0.0 {
        (
            TradeDirection::Long,
            (event_bar.close - event_bar.open) / event_bar.open * 100.0,
        )
    } else if trend_indicator < 0.0 {
        (
            TradeDirection::Short,
            (event_bar.open - event_bar.close) / event_bar.open * 100.0,
        )
    } else {
        (TradeDirection::NoTrade, 0.0)
    };

    let range = prev_bar.high - prev_bar.low;
    let body_to_range_ratio = if range > 0.0 {
        (prev_bar.close - prev_bar.open).abs() / range
    } else {
        0.0
    };

    Some(TradeRecord {
        event_date: event.date,
        event_kind: event.kind,
        opening_day,
        previous_day,
        opening_price,
        previous_close,
        trend_indicator,
        direction,
        entry_price: event_bar.open,
        exit_price: event_bar.close,
        pnl_percent,
        prior_candle_bullish: prev_bar.close > prev_bar.open,
        gapped_up: event_bar.open > prev_bar.close,
        body_to_range_ratio,
    })
}
