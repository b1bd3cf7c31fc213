//! Fixed-weekday benchmark — replays the identical strategy on every other
//! weekday to test whether the pattern is settlement-specific or plain
//! weekday seasonality.
//!
//! The per-weekday replays are independent, so they fan out across the
//! rayon pool and are collected back in weekday order.

use chrono::Weekday;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use settlelab_core::config::EngineConfig;
use settlelab_core::data::BarTable;
use settlelab_core::engine::run_fixed_day_backtest;

use crate::metrics::PerformanceStats;

/// One weekday's benchmark replay, reduced to its statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    /// Lowercase English weekday name.
    pub weekday: String,
    pub event_count: usize,
    /// Ledger length, including NoTrade records.
    pub record_count: usize,
    pub skipped_events: usize,
    pub stats: PerformanceStats,
}

pub(crate) fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Replay every business weekday except the configured settlement weekday.
///
/// Entries come back in Monday..Friday order regardless of how the pool
/// schedules them.
pub fn run_weekday_benchmarks(table: &BarTable, config: &EngineConfig) -> Vec<BenchmarkEntry> {
    let weekdays: Vec<Weekday> = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
    .into_iter()
    .filter(|wd| *wd != config.event_weekday)
    .collect();

    weekdays
        .par_iter()
        .map(|&weekday| {
            let run = run_fixed_day_backtest(table, weekday, config);
            BenchmarkEntry {
                weekday: weekday_label(weekday).to_string(),
                event_count: run.events.len(),
                record_count: run.ledger.len(),
                skipped_events: run.skipped_events(),
                stats: PerformanceStats::compute(&run.ledger, run.candidate_days),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use settlelab_core::data::generate_synthetic_bars;

    fn synthetic_table() -> BarTable {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        BarTable::from_bars(generate_synthetic_bars("BENCHMARK", start, end), start, end).unwrap()
    }

    #[test]
    fn settlement_weekday_is_excluded() {
        let table = synthetic_table();
        let entries = run_weekday_benchmarks(&table, &EngineConfig::default());

        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.weekday != "wednesday"));
    }

    #[test]
    fn entries_come_back_in_weekday_order() {
        let table = synthetic_table();
        let entries = run_weekday_benchmarks(&table, &EngineConfig::default());
        let names: Vec<&str> = entries.iter().map(|e| e.weekday.as_str()).collect();
        assert_eq!(names, vec!["monday", "tuesday", "thursday", "friday"]);
    }

    #[test]
    fn entry_counts_are_coherent() {
        let table = synthetic_table();
        for entry in run_weekday_benchmarks(&table, &EngineConfig::default()) {
            assert!(entry.record_count <= entry.event_count);
            assert_eq!(entry.skipped_events, entry.event_count - entry.record_count);
            assert_eq!(
                entry.stats.win_count + entry.stats.loss_count + entry.stats.breakeven_count,
                entry.stats.trade_count
            );
        }
    }

    #[test]
    fn alternate_settlement_weekday_shifts_the_exclusion() {
        let table = synthetic_table();
        let config = EngineConfig {
            event_weekday: Weekday::Fri,
            ..EngineConfig::default()
        };
        let entries = run_weekday_benchmarks(&table, &config);
        let names: Vec<&str> = entries.iter().map(|e| e.weekday.as_str()).collect();
        assert_eq!(names, vec!["monday", "tuesday", "wednesday", "thursday"]);
    }
}
