//! EventDate — a detected settlement (or benchmark) day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cadence classification of an event date.
///
/// `Monthly` marks the third occurrence of the settlement weekday within its
/// calendar month (the monthly contract expiry); every other settlement is
/// `Weekly`. `FixedDay` tags benchmark events located on an arbitrary
/// weekday, which carry no sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Weekly,
    Monthly,
    FixedDay,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Weekly => "weekly",
            EventKind::Monthly => "monthly",
            EventKind::FixedDay => "fixed_day",
        }
    }
}

/// A single detected event day. Events are derived once per run, strictly
/// ordered by date with no duplicates, and only exist for dates present in
/// the regular-session trading calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDate {
    pub date: NaiveDate,
    pub kind: EventKind,
}
