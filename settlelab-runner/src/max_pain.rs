//! Max-pain sibling analysis over option open interest.
//!
//! For a strike grid spanning the chain, total pain at K is the aggregate
//! option-holder payout: Σ max(0, K − strike)·call_OI + Σ max(0, strike −
//! K)·put_OI. The max-pain price is the grid strike minimizing that sum.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaxPainError {
    #[error("failed to read open-interest CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("strike_step must be positive, got {0}")]
    InvalidStrikeStep(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Call,
    Put,
}

/// One open-interest row of the normalized options table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenInterestRow {
    pub date: NaiveDate,
    pub strike: f64,
    pub option_type: OptionType,
    pub open_interest: u64,
}

/// TAIFEX strike spacing for TXO.
pub const DEFAULT_STRIKE_STEP: f64 = 100.0;

/// Aggregate option-holder payout if settlement lands exactly on `strike`.
pub fn total_pain_at(rows: &[OpenInterestRow], strike: f64) -> f64 {
    rows.iter()
        .map(|row| {
            let oi = row.open_interest as f64;
            match row.option_type {
                OptionType::Call => (strike - row.strike).max(0.0) * oi,
                OptionType::Put => (row.strike - strike).max(0.0) * oi,
            }
        })
        .sum()
}

/// The strike on the `strike_step` grid (spanning the chain's min..max
/// strike, inclusive) with the least total pain. Zero-OI rows are ignored;
/// ties resolve to the lowest strike; an empty chain yields `None`.
pub fn max_pain_strike(
    rows: &[OpenInterestRow],
    strike_step: f64,
) -> Result<Option<f64>, MaxPainError> {
    if strike_step <= 0.0 {
        return Err(MaxPainError::InvalidStrikeStep(strike_step));
    }

    let live: Vec<OpenInterestRow> = rows
        .iter()
        .filter(|r| r.open_interest > 0)
        .cloned()
        .collect();
    if live.is_empty() {
        return Ok(None);
    }

    let min_strike = live.iter().map(|r| r.strike).fold(f64::MAX, f64::min);
    let max_strike = live.iter().map(|r| r.strike).fold(f64::MIN, f64::max);

    let mut best: Option<(f64, f64)> = None;
    let mut strike = min_strike;
    while strike <= max_strike + 1e-9 {
        let pain = total_pain_at(&live, strike);
        match best {
            Some((_, best_pain)) if pain >= best_pain => {}
            _ => best = Some((strike, pain)),
        }
        strike += strike_step;
    }

    Ok(best.map(|(strike, _)| strike))
}

/// Load a normalized open-interest CSV with columns
/// `date,strike,option_type,open_interest`.
pub fn load_open_interest_csv(path: &Path) -> Result<Vec<OpenInterestRow>, MaxPainError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: OpenInterestRow = record?;
        rows.push(row);
    }
    Ok(rows)
}
