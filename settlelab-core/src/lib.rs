//! SettleLab Core — settlement-pattern backtest engine.
//!
//! This crate contains the deterministic heart of the system:
//! - Domain types (session bars, event dates, trade records)
//! - BarTable with a sorted trading-date index (O(log n) predecessor and
//!   successor queries)
//! - Calendar/event locator (weekly settlements, third-weekday monthly
//!   tagging, fixed-weekday benchmark series)
//! - Reference-day resolver (prior-event anchor with an explicit
//!   first-event convention, benchmark lookback variant)
//! - Signal & trade simulator (standard / night / settlement-open price
//!   variants, same-day open-to-close execution)
//! - Ledger assembly as a pure pipeline over immutable inputs
//!
//! Statistics engines live in `settlelab-runner`; this crate only produces
//! the ledger they consume.

pub mod calendar;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod resolver;
pub mod simulator;
