//! Backtest assembly — locate events, resolve reference days, simulate,
//! and collect the chronological trade ledger.
//!
//! Every stage takes its inputs as parameters and returns a new value; no
//! stage reads or writes shared state, so a run is a pure function of the
//! bar table and the configuration.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{locate_fixed_weekday, locate_settlements};
use crate::config::{CountingPeriod, EngineConfig};
use crate::data::BarTable;
use crate::domain::{EventDate, EventKind, Ledger};
use crate::resolver::{resolve_lookback_opening_day, resolve_opening_day, resolve_previous_day};
use crate::simulator::simulate;

/// Output of one replay: the event series, the trade ledger, and the
/// denominator for the event-rate exposure metric.
///
/// `candidate_days` is the event count for the settlement replay and the
/// distinct-trading-date count for the fixed-weekday replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRun {
    pub events: Vec<EventDate>,
    pub ledger: Ledger,
    pub candidate_days: usize,
}

impl BacktestRun {
    /// Events that could not be resolved or simulated. Skips are silent by
    /// design; this count is the only trace they leave.
    pub fn skipped_events(&self) -> usize {
        self.events.len() - self.ledger.len()
    }
}

/// Replay the settlement series under `config`.
pub fn run_settlement_backtest(table: &BarTable, config: &EngineConfig) -> BacktestRun {
    let mut events = locate_settlements(table, config.event_weekday);
    if config.counting_period == CountingPeriod::Monthly {
        events.retain(|e| e.kind == EventKind::Monthly);
    }

    let ledger = build_ledger(&events, table, config, |event_date| {
        resolve_opening_day(event_date, &events, table)
    });

    let candidate_days = events.len();
    BacktestRun {
        events,
        ledger,
        candidate_days,
    }
}

/// Replay the same strategy on every occurrence of an arbitrary weekday,
/// excluding the settlement series to avoid overlap. Used by the benchmark
/// comparator to test whether the pattern is settlement-specific.
pub fn run_fixed_day_backtest(
    table: &BarTable,
    weekday: Weekday,
    config: &EngineConfig,
) -> BacktestRun {
    let settlements: Vec<NaiveDate> = locate_settlements(table, config.event_weekday)
        .into_iter()
        .map(|e| e.date)
        .collect();
    let events = locate_fixed_weekday(table, weekday, &settlements);

    let ledger = build_ledger(&events, table, config, |event_date| {
        resolve_lookback_opening_day(event_date, table)
    });

    let candidate_days = table.trading_dates().len();
    BacktestRun {
        events,
        ledger,
        candidate_days,
    }
}

/// Process events strictly in chronological order; a failed opening-day,
/// previous-day, or bar lookup skips the event without a record.
fn build_ledger<F>(
    events: &[EventDate],
    table: &BarTable,
    config: &EngineConfig,
    resolve_opening: F,
) -> Ledger
where
    F: Fn(NaiveDate) -> Option<NaiveDate>,
{
    let mut ledger = Vec::with_capacity(events.len());
    for event in events {
        let Some(opening_day) = resolve_opening(event.date) else {
            continue;
        };
        let Some(previous_day) = resolve_previous_day(event.date, opening_day, table) else {
            continue;
        };
        if let Some(record) = simulate(
            event,
            opening_day,
            previous_day,
            table,
            config.opening_price_calc,
            config.prev_close_calc,
        ) {
            ledger.push(record);
        }
    }
    ledger
}
