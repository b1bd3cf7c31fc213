//! Seasonal aggregation — per-month and per-quarter trade performance.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use settlelab_core::domain::TradeRecord;

use crate::metrics::round2;

/// One calendar bucket (a month or a quarter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalBucket {
    pub trade_count: usize,
    pub win_rate: f64,
    pub avg_pnl: f64,
}

/// Monthly (1-12) and quarterly (1-4) performance buckets, keyed by the
/// event date's calendar position. Only buckets with at least one trade
/// appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalStats {
    pub monthly: BTreeMap<u32, SeasonalBucket>,
    pub quarterly: BTreeMap<u32, SeasonalBucket>,
}

/// Aggregate the ledger's trades into seasonal buckets.
pub fn seasonal_stats(ledger: &[TradeRecord]) -> SeasonalStats {
    let mut monthly: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut quarterly: BTreeMap<u32, Vec<f64>> = BTreeMap::new();

    for record in ledger.iter().filter(|r| r.is_trade()) {
        let month = record.event_date.month();
        let quarter = (month - 1) / 3 + 1;
        monthly.entry(month).or_default().push(record.pnl_percent);
        quarterly.entry(quarter).or_default().push(record.pnl_percent);
    }

    SeasonalStats {
        monthly: monthly.into_iter().map(|(k, v)| (k, bucket(&v))).collect(),
        quarterly: quarterly.into_iter().map(|(k, v)| (k, bucket(&v))).collect(),
    }
}

fn bucket(pnls: &[f64]) -> SeasonalBucket {
    let trade_count = pnls.len();
    let wins = pnls.iter().filter(|p| **p > 0.0).count();
    let win_rate = wins as f64 / trade_count as f64 * 100.0;
    let avg_pnl = pnls.iter().sum::<f64>() / trade_count as f64;
    SeasonalBucket {
        trade_count,
        win_rate: round2(win_rate),
        avg_pnl: round2(avg_pnl),
    }
}
