//! Single-backtest entry point — wires config, data, engine, and the
//! statistics engines into one serializable result.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use settlelab_core::config::ConfigError;
use settlelab_core::data::{BarTable, DataError};
use settlelab_core::domain::Ledger;
use settlelab_core::engine::run_settlement_backtest;
use thiserror::Error;

use crate::config::BacktestConfig;
use crate::data_loader::LoadedBars;
use crate::metrics::PerformanceStats;
use crate::risk::RiskMetrics;
use crate::seasonal::{seasonal_stats, SeasonalStats};
use crate::segment::segment_all;
use crate::volatility::{compare_event_volatility, VolatilityComparison};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
///
/// A run over data that yields zero resolvable events is still a valid
/// result: empty ledger, all-zero statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub dataset_hash: String,
    pub is_synthetic: bool,

    pub event_count: usize,
    pub skipped_events: usize,

    pub trades: Ledger,
    pub stats: PerformanceStats,
    pub risk: RiskMetrics,
    /// dimension name → category label → stats.
    pub filters: BTreeMap<String, BTreeMap<String, PerformanceStats>>,
    pub seasonal: SeasonalStats,
    pub volatility: VolatilityComparison,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run one settlement backtest over pre-loaded bars.
pub fn run_single_backtest(
    config: &BacktestConfig,
    loaded: &LoadedBars,
) -> Result<BacktestResult, RunError> {
    let resolved = config.resolve()?;
    let table = BarTable::from_bars(loaded.bars.clone(), resolved.start_date, resolved.end_date)?;

    let run = run_settlement_backtest(&table, &resolved.engine);

    let stats = PerformanceStats::compute(&run.ledger, run.candidate_days);
    let risk = RiskMetrics::compute(&run.ledger, resolved.engine.periods_per_year);
    let filters = segment_all(&run.ledger, run.candidate_days);
    let seasonal = seasonal_stats(&run.ledger);
    let volatility = compare_event_volatility(&table, &run.events);

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        start_date: resolved.start_date,
        end_date: resolved.end_date,
        dataset_hash: loaded.dataset_hash.clone(),
        is_synthetic: loaded.is_synthetic,
        event_count: run.events.len(),
        skipped_events: run.skipped_events(),
        trades: run.ledger,
        stats,
        risk,
        filters,
        seasonal,
        volatility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::{load_bars, LoadOptions};

    fn synthetic_loaded() -> LoadedBars {
        load_bars(&LoadOptions {
            path: None,
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            synthetic: true,
        })
        .unwrap()
    }

    fn config() -> BacktestConfig {
        BacktestConfig::from_toml(
            r#"
[backtest]
start_date = "2022-01-01"
end_date = "2023-12-31"
"#,
        )
        .unwrap()
    }

    #[test]
    fn full_run_produces_coherent_result() {
        let result = run_single_backtest(&config(), &synthetic_loaded()).unwrap();

        assert_eq!(result.schema_version, SCHEMA_VERSION);
        assert!(result.event_count > 0);
        assert_eq!(
            result.skipped_events,
            result.event_count - result.trades.len()
        );
        assert_eq!(
            result.stats.win_count + result.stats.loss_count + result.stats.breakeven_count,
            result.stats.trade_count
        );
        assert!(result.is_synthetic);
    }

    #[test]
    fn invalid_config_fails_before_any_computation() {
        let mut bad = config();
        bad.backtest.opening_price_calc = "lunch".to_string();
        let err = run_single_backtest(&bad, &synthetic_loaded()).unwrap_err();
        assert!(matches!(err, RunError::Config(_)));
    }

    #[test]
    fn empty_window_fails_with_data_error() {
        let mut narrow = config();
        // A weekend: no trading days inside the window.
        narrow.backtest.start_date = "2022-01-01".to_string();
        narrow.backtest.end_date = "2022-01-02".to_string();
        let err = run_single_backtest(&narrow, &synthetic_loaded()).unwrap_err();
        assert!(matches!(err, RunError::Data(_)));
    }

    #[test]
    fn result_serializes_to_json() {
        let result = run_single_backtest(&config(), &synthetic_loaded()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let deser: BacktestResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deser.run_id, result.run_id);
        assert_eq!(deser.trades.len(), result.trades.len());
    }
}
