//! Risk metrics — annualized ratios and tail statistics over the trade
//! return series.
//!
//! All functions operate on fractional returns (pnl_percent / 100) in
//! ledger order. `periods_per_year` reflects the event cadence (52 for the
//! weekly series, 12 for monthly).

use serde::{Deserialize, Serialize};
use settlelab_core::domain::TradeRecord;

use crate::metrics::{max_drawdown, round2, round3};

/// Risk statistics for a ledger's trade return series.
///
/// `sortino_ratio` is `+inf` when there is no downside and the annualized
/// return is positive; serde_json renders non-finite floats as null, which
/// the report layer prints as "inf".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Mean return × periods_per_year, in percent.
    pub annualized_return: f64,
    /// Stdev of returns × sqrt(periods_per_year), in percent.
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    /// 5th percentile of per-trade returns, in percent.
    pub var_95: f64,
    /// Mean of returns at or below the 5th percentile, in percent.
    pub cvar_95: f64,
    pub max_consecutive_losses: usize,
    pub sample_size: usize,
}

impl RiskMetrics {
    /// Compute all risk metrics over the trade subset of `records`.
    /// An empty subset yields the all-zero value.
    pub fn compute(records: &[TradeRecord], periods_per_year: f64) -> Self {
        let returns: Vec<f64> = records
            .iter()
            .filter(|r| r.is_trade())
            .map(|r| r.return_fraction())
            .collect();
        if returns.is_empty() {
            return Self::default();
        }

        let annualized_return = mean(&returns) * periods_per_year * 100.0;
        let volatility = std_dev(&returns) * periods_per_year.sqrt() * 100.0;

        let sharpe_ratio = if volatility > 0.0 {
            annualized_return / volatility
        } else {
            0.0
        };

        let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let sortino_ratio = if downside.is_empty() {
            if annualized_return > 0.0 {
                f64::INFINITY
            } else {
                0.0
            }
        } else {
            let downside_deviation = std_dev(&downside) * periods_per_year.sqrt() * 100.0;
            if downside_deviation > 0.0 {
                annualized_return / downside_deviation
            } else {
                0.0
            }
        };

        let var_95 = percentile(&returns, 5.0) * 100.0;
        let tail: Vec<f64> = returns
            .iter()
            .copied()
            .filter(|r| *r * 100.0 <= var_95 + 1e-12)
            .collect();
        let cvar_95 = mean(&tail) * 100.0;

        // Drawdown in percent via the same cumulative method as the
        // performance stats.
        let pnls: Vec<f64> = returns.iter().map(|r| r * 100.0).collect();
        let dd = max_drawdown(&pnls);
        let calmar_ratio = if dd < 0.0 {
            annualized_return / dd.abs()
        } else {
            0.0
        };

        Self {
            annualized_return: round2(annualized_return),
            volatility: round2(volatility),
            sharpe_ratio: round3(sharpe_ratio),
            sortino_ratio: if sortino_ratio.is_finite() {
                round3(sortino_ratio)
            } else {
                sortino_ratio
            },
            calmar_ratio: round3(calmar_ratio),
            var_95: round2(var_95),
            cvar_95: round2(cvar_95),
            max_consecutive_losses: max_consecutive_losses(&returns),
            sample_size: returns.len(),
        }
    }
}

/// Longest run of consecutive negative returns in chronological order.
pub fn max_consecutive_losses(returns: &[f64]) -> usize {
    let mut max_streak = 0;
    let mut current = 0;
    for r in returns {
        if *r < 0.0 {
            current += 1;
            if current > max_streak {
                max_streak = current;
            }
        } else {
            current = 0;
        }
    }
    max_streak
}

/// q-th percentile (0..100) with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let weight = rank - lo as f64;
        sorted[lo] * (1.0 - weight) + sorted[hi] * weight
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
