//! BarTable — the normalized market-data table with a sorted date index.
//!
//! Reference-day resolution needs predecessor/successor queries over the
//! trading calendar; the table keeps a sorted vector of distinct
//! regular-session dates so those are O(log n) binary searches instead of
//! day-by-day membership scans. Dates absent from the index are non-trading
//! days by definition.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Bar, Session};

/// Errors raised while building the table from collaborator-provided bars.
///
/// These are fatal: a malformed dataset aborts the run before any event is
/// processed. Per-event gaps are not errors — a missing date simply is not
/// a trading day.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no bars in the requested window ({start} to {end})")]
    Empty { start: NaiveDate, end: NaiveDate },

    #[error("bar for {date} ({session:?}) violates OHLC ordering")]
    InsaneBar { date: NaiveDate, session: Session },

    #[error("duplicate bar for {date} ({session:?})")]
    DuplicateBar { date: NaiveDate, session: Session },
}

/// Immutable, session-keyed bar table for one backtest run.
#[derive(Debug, Clone)]
pub struct BarTable {
    bars: HashMap<(NaiveDate, Session), Bar>,
    /// Sorted distinct dates that carry a regular-session bar.
    trading_dates: Vec<NaiveDate>,
}

impl BarTable {
    /// Build the table from raw bars, keeping only dates inside the
    /// inclusive `[start, end]` window.
    pub fn from_bars(
        bars: Vec<Bar>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, DataError> {
        let mut map: HashMap<(NaiveDate, Session), Bar> = HashMap::new();
        let mut trading_dates: Vec<NaiveDate> = Vec::new();

        for bar in bars {
            if bar.date < start || bar.date > end {
                continue;
            }
            if !bar.is_sane() {
                return Err(DataError::InsaneBar {
                    date: bar.date,
                    session: bar.session,
                });
            }
            if bar.session == Session::Regular {
                trading_dates.push(bar.date);
            }
            let key = (bar.date, bar.session);
            if map.insert(key, bar).is_some() {
                return Err(DataError::DuplicateBar {
                    date: key.0,
                    session: key.1,
                });
            }
        }

        if trading_dates.is_empty() {
            return Err(DataError::Empty { start, end });
        }
        trading_dates.sort_unstable();

        Ok(Self {
            bars: map,
            trading_dates,
        })
    }

    pub fn bar(&self, date: NaiveDate, session: Session) -> Option<&Bar> {
        self.bars.get(&(date, session))
    }

    /// True when `date` carries a regular-session bar.
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        self.trading_dates.binary_search(&date).is_ok()
    }

    /// Sorted distinct regular-session dates.
    pub fn trading_dates(&self) -> &[NaiveDate] {
        &self.trading_dates
    }

    pub fn first_trading_day(&self) -> Option<NaiveDate> {
        self.trading_dates.first().copied()
    }

    pub fn last_trading_day(&self) -> Option<NaiveDate> {
        self.trading_dates.last().copied()
    }

    /// Latest trading date strictly before `date`.
    pub fn prev_trading_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        let idx = self.trading_dates.partition_point(|d| *d < date);
        idx.checked_sub(1).map(|i| self.trading_dates[i])
    }

    /// Earliest trading date at or after `date`.
    pub fn next_trading_day_on_or_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let idx = self.trading_dates.partition_point(|d| *d < date);
        self.trading_dates.get(idx).copied()
    }
}
