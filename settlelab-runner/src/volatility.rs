//! Event-day volatility — do settlement days move more than ordinary days?

use serde::{Deserialize, Serialize};
use settlelab_core::data::BarTable;
use settlelab_core::domain::{EventDate, Session};

use crate::metrics::round2;

/// Stdev of regular-session open→close returns on event days vs all other
/// trading days, in percent, plus their ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityComparison {
    pub event_day_volatility: f64,
    pub baseline_volatility: f64,
    /// event / baseline; 0 when the baseline volatility is 0.
    pub ratio: f64,
}

/// Compare intraday volatility on event days against the rest of the
/// calendar. `events` must be sorted ascending by date.
pub fn compare_event_volatility(table: &BarTable, events: &[EventDate]) -> VolatilityComparison {
    let mut event_returns = Vec::new();
    let mut baseline_returns = Vec::new();

    for &date in table.trading_dates() {
        let Some(bar) = table.bar(date, Session::Regular) else {
            continue;
        };
        let intraday = (bar.close - bar.open) / bar.open * 100.0;
        if events.binary_search_by(|e| e.date.cmp(&date)).is_ok() {
            event_returns.push(intraday);
        } else {
            baseline_returns.push(intraday);
        }
    }

    let event_day_volatility = std_dev(&event_returns);
    let baseline_volatility = std_dev(&baseline_returns);
    let ratio = if baseline_volatility > 0.0 {
        event_day_volatility / baseline_volatility
    } else {
        0.0
    };

    VolatilityComparison {
        event_day_volatility: round2(event_day_volatility),
        baseline_volatility: round2(baseline_volatility),
        ratio: round2(ratio),
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
