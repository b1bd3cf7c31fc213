//! Performance statistics — pure functions over a ledger subset.
//!
//! Every figure is derived from the records passed in plus the candidate
//! denominator; nothing is cached or read from shared state, so the same
//! engine serves the overall run, every filter partition, and the weekday
//! benchmarks.

use serde::{Deserialize, Serialize};
use settlelab_core::domain::TradeRecord;

/// Aggregate performance statistics for a ledger subset.
///
/// All percentage-like fields are rounded to 2 decimals;
/// `profit_loss_ratio` to 3. Rate fields (`win_rate`, `kelly`,
/// `event_rate`, `max_drawdown`) are stored numerically — the percent-sign
/// rendering belongs to the report layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub net_profit: f64,
    pub total_profit: f64,
    /// Sum over losing trades; non-positive.
    pub total_loss: f64,
    pub max_profit: f64,
    pub max_loss: f64,

    pub win_count: usize,
    pub loss_count: usize,
    pub breakeven_count: usize,
    pub trade_count: usize,

    pub avg_win: f64,
    pub avg_loss: f64,
    pub avg_trade: f64,

    pub win_rate: f64,
    pub profit_loss_ratio: f64,
    pub kelly: f64,
    /// Non-positive; cumulative-sum drawdown over the subset in ledger order.
    pub max_drawdown: f64,
    /// Exposure metric: trades per candidate day, in percent.
    pub event_rate: f64,
}

impl PerformanceStats {
    /// Compute the full battery over `records`, ignoring `NoTrade` entries.
    ///
    /// An empty trade subset yields the all-zero value — "no data" is an
    /// answer, not an error.
    pub fn compute(records: &[TradeRecord], candidate_days: usize) -> Self {
        let pnls: Vec<f64> = records
            .iter()
            .filter(|r| r.is_trade())
            .map(|r| r.pnl_percent)
            .collect();
        if pnls.is_empty() {
            return Self::default();
        }

        let trade_count = pnls.len();
        let win_count = pnls.iter().filter(|p| **p > 0.0).count();
        let loss_count = pnls.iter().filter(|p| **p < 0.0).count();
        let breakeven_count = trade_count - win_count - loss_count;

        let net_profit: f64 = pnls.iter().sum();
        let total_profit: f64 = pnls.iter().filter(|p| **p > 0.0).sum();
        let total_loss: f64 = pnls.iter().filter(|p| **p < 0.0).sum();
        let max_profit = pnls.iter().cloned().fold(f64::MIN, f64::max);
        let max_loss = pnls.iter().cloned().fold(f64::MAX, f64::min);

        let avg_win = if win_count > 0 {
            total_profit / win_count as f64
        } else {
            0.0
        };
        let avg_loss = if loss_count > 0 {
            total_loss / loss_count as f64
        } else {
            0.0
        };
        let avg_trade = net_profit / trade_count as f64;

        let win_rate = win_count as f64 / trade_count as f64 * 100.0;
        let profit_loss_ratio = if avg_loss != 0.0 {
            (avg_win / avg_loss).abs()
        } else {
            0.0
        };
        let kelly = kelly_fraction(win_rate, profit_loss_ratio);

        let event_rate = if candidate_days > 0 {
            trade_count as f64 / candidate_days as f64 * 100.0
        } else {
            0.0
        };

        Self {
            net_profit: round2(net_profit),
            total_profit: round2(total_profit),
            total_loss: round2(total_loss),
            max_profit: round2(max_profit),
            max_loss: round2(max_loss),
            win_count,
            loss_count,
            breakeven_count,
            trade_count,
            avg_win: round2(avg_win),
            avg_loss: round2(avg_loss),
            avg_trade: round2(avg_trade),
            win_rate: round2(win_rate),
            profit_loss_ratio: round3(profit_loss_ratio),
            kelly: round2(kelly),
            max_drawdown: round2(max_drawdown(&pnls)),
            event_rate: round2(event_rate),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trade_count == 0
    }
}

/// Kelly criterion f* = (bp − q)/b in percent, with b the profit/loss
/// ratio and p the win probability. Defined only for b > 0 and p > 0.
pub fn kelly_fraction(win_rate_percent: f64, profit_loss_ratio: f64) -> f64 {
    if profit_loss_ratio <= 0.0 || win_rate_percent <= 0.0 {
        return 0.0;
    }
    let p = win_rate_percent / 100.0;
    let q = 1.0 - p;
    let b = profit_loss_ratio;
    (b * p - q) / b * 100.0
}

/// Maximum drawdown of the cumulative P&L series, as a non-positive
/// percentage: min over t of (cumsum_t − running_max_t).
pub fn max_drawdown(pnls: &[f64]) -> f64 {
    let mut cumulative = 0.0_f64;
    let mut running_max = 0.0_f64;
    let mut max_dd = 0.0_f64;

    for (i, pnl) in pnls.iter().enumerate() {
        cumulative += pnl;
        if i == 0 {
            running_max = cumulative;
        } else if cumulative > running_max {
            running_max = cumulative;
        }
        let dd = cumulative - running_max;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
