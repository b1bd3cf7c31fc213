//! Calendar/event locator — derives settlement dates from the trading calendar.
//!
//! Pure date logic: no IO, no wall-clock, no randomness. An event only
//! exists for dates that carry a regular-session bar.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::data::BarTable;
use crate::domain::{EventDate, EventKind};

/// 1-based occurrence index of `date`'s weekday within its calendar month
/// (the 15th..21st is always the 3rd occurrence).
pub fn weekday_occurrence_in_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// Locate every settlement event: trading days falling on `weekday`,
/// tagged `Monthly` when they are the month's third such weekday and
/// `Weekly` otherwise.
///
/// Boundary months that never reach the third occurrence inside the dataset
/// simply contribute weekly events (or none) — that is not an error.
pub fn locate_settlements(table: &BarTable, weekday: Weekday) -> Vec<EventDate> {
    table
        .trading_dates()
        .iter()
        .filter(|date| date.weekday() == weekday)
        .map(|&date| {
            let kind = if weekday_occurrence_in_month(date) == 3 {
                EventKind::Monthly
            } else {
                EventKind::Weekly
            };
            EventDate { date, kind }
        })
        .collect()
}

/// Locate benchmark events: every trading day on `weekday` that is not in
/// `exclude` (the settlement series, to avoid overlap). No sub-typing.
///
/// `exclude` must be sorted ascending.
pub fn locate_fixed_weekday(
    table: &BarTable,
    weekday: Weekday,
    exclude: &[NaiveDate],
) -> Vec<EventDate> {
    table
        .trading_dates()
        .iter()
        .filter(|date| date.weekday() == weekday)
        .filter(|date| exclude.binary_search(date).is_err())
        .map(|&date| EventDate {
            date,
            kind: EventKind::FixedDay,
        })
        .collect()
}
