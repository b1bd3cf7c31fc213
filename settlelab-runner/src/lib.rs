//! SettleLab Runner — backtest orchestration, statistics engines, benchmarks,
//! and reporting.
//!
//! This crate builds on `settlelab-core` to provide:
//! - TOML-backed run configuration with validation and content-addressed ids
//! - CSV bar ingestion with a deterministic synthetic fallback
//! - Performance statistics (win rate, profit/loss ratio, Kelly, drawdown)
//! - Risk metrics (Sharpe, Sortino, Calmar, VaR/CVaR, loss streaks)
//! - Filter segmentation, seasonal aggregation, event-day volatility
//! - Fixed-weekday benchmark comparator
//! - Max-pain sibling calculator over option open interest
//! - Markdown report and artifact export

pub mod benchmark;
pub mod config;
pub mod data_loader;
pub mod max_pain;
pub mod metrics;
pub mod reporting;
pub mod risk;
pub mod runner;
pub mod seasonal;
pub mod segment;
pub mod volatility;

pub use benchmark::{run_weekday_benchmarks, BenchmarkEntry};
pub use config::{BacktestConfig, ConfigFileError, ResolvedConfig};
pub use data_loader::{load_bars, LoadError, LoadOptions, LoadedBars};
pub use max_pain::{max_pain_strike, OpenInterestRow, OptionType};
pub use metrics::PerformanceStats;
pub use reporting::{render_benchmark_table, render_report, save_artifacts, ArtifactPaths};
pub use risk::RiskMetrics;
pub use runner::{run_single_backtest, BacktestResult, RunError};
pub use seasonal::{seasonal_stats, SeasonalBucket, SeasonalStats};
pub use segment::{segment, segment_all, SegmentDimension};
pub use volatility::{compare_event_volatility, VolatilityComparison};

/// Shared fixtures for the statistics test suites.
#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use settlelab_core::domain::{EventKind, TradeDirection, TradeRecord};

    /// A ledger record with the given P&L, dated by an index so synthetic
    /// ledgers stay chronological.
    pub fn record_at(index: u32, pnl: f64, direction: TradeDirection) -> TradeRecord {
        let event_date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
            + chrono::Duration::weeks(index as i64);
        TradeRecord {
            event_date,
            event_kind: if is_third_week(event_date) {
                EventKind::Monthly
            } else {
                EventKind::Weekly
            },
            opening_day: event_date - chrono::Duration::days(6),
            previous_day: event_date - chrono::Duration::days(1),
            opening_price: 17_000.0,
            previous_close: match direction {
                TradeDirection::Long => 17_100.0,
                TradeDirection::Short => 16_900.0,
                TradeDirection::NoTrade => 17_000.0,
            },
            trend_indicator: match direction {
                TradeDirection::Long => 100.0,
                TradeDirection::Short => -100.0,
                TradeDirection::NoTrade => 0.0,
            },
            direction,
            entry_price: 17_050.0,
            exit_price: 17_050.0 * (1.0 + pnl / 100.0),
            pnl_percent: pnl,
            prior_candle_bullish: pnl > 0.0,
            gapped_up: pnl >= 0.0,
            body_to_range_ratio: 0.5,
        }
    }

    pub fn trade(index: u32, pnl: f64) -> TradeRecord {
        record_at(
            index,
            pnl,
            if pnl < 0.0 {
                TradeDirection::Short
            } else {
                TradeDirection::Long
            },
        )
    }

    fn is_third_week(date: NaiveDate) -> bool {
        let day = chrono::Datelike::day(&date);
        (15..=21).contains(&day)
    }
}
