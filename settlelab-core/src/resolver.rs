//! Reference-day resolution — the opening day and previous day for an event.
//!
//! The trend signal measures the move accumulated since the *prior*
//! settlement cycle began, so the opening-day anchor chains to the previous
//! event rather than a fixed window. Both resolutions snap through the
//! sorted trading-date index; a failed resolution means the event is
//! skipped, never partially recorded.

use chrono::{Duration, NaiveDate};

use crate::data::BarTable;
use crate::domain::EventDate;

/// Calendar-day lookback for the very first event in a series, which has no
/// prior settlement to anchor to.
const FIRST_EVENT_LOOKBACK_DAYS: i64 = 7;

/// Lookbacks for the fixed-weekday benchmark variant, which has no event
/// series at all: one week, then a shorter retry.
const BENCHMARK_LOOKBACK_DAYS: i64 = 7;
const BENCHMARK_FALLBACK_DAYS: i64 = 3;

/// Resolve the opening day for `event_date`: the first trading day after
/// the latest event strictly before it (or a fixed one-week lookback for
/// the first event), snapped forward, and never past the event itself.
///
/// `events` must be sorted ascending by date.
pub fn resolve_opening_day(
    event_date: NaiveDate,
    events: &[EventDate],
    table: &BarTable,
) -> Option<NaiveDate> {
    let idx = events.partition_point(|e| e.date < event_date);
    let candidate = match idx.checked_sub(1) {
        Some(prev) => events[prev].date + Duration::days(1),
        None => event_date - Duration::days(FIRST_EVENT_LOOKBACK_DAYS),
    };

    let opening = table.next_trading_day_on_or_after(candidate)?;
    (opening <= event_date).then_some(opening)
}

/// Resolve the previous day for `event_date`: the last trading day strictly
/// before it, which must not precede the opening day.
pub fn resolve_previous_day(
    event_date: NaiveDate,
    opening_day: NaiveDate,
    table: &BarTable,
) -> Option<NaiveDate> {
    let previous = table.prev_trading_day(event_date)?;
    (previous >= opening_day).then_some(previous)
}

/// Benchmark opening day: a 7-calendar-day lookback snapped forward,
/// retried at 3 days, and always strictly before the target date.
pub fn resolve_lookback_opening_day(target: NaiveDate, table: &BarTable) -> Option<NaiveDate> {
    for lookback in [BENCHMARK_LOOKBACK_DAYS, BENCHMARK_FALLBACK_DAYS] {
        let candidate = target - Duration::days(lookback);
        if let Some(opening) = table.next_trading_day_on_or_after(candidate) {
            if opening < target {
                return Some(opening);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, EventKind, Session};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(y: i32, m: u32, d: u32) -> EventDate {
        EventDate {
            date: date(y, m, d),
            kind: EventKind::Weekly,
        }
    }

    fn table_for(dates: &[NaiveDate]) -> BarTable {
        let bars: Vec<Bar> = dates
            .iter()
            .map(|&d| Bar {
                date: d,
                session: Session::Regular,
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 1,
            })
            .collect();
        let start = *dates.iter().min().unwrap();
        let end = *dates.iter().max().unwrap();
        BarTable::from_bars(bars, start, end).unwrap()
    }

    /// Weekday-only table covering January 2024.
    fn january_table() -> BarTable {
        let mut dates = Vec::new();
        let mut current = date(2024, 1, 1);
        while current <= date(2024, 1, 31) {
            let wd = chrono::Datelike::weekday(&current);
            if wd != chrono::Weekday::Sat && wd != chrono::Weekday::Sun {
                dates.push(current);
            }
            current += Duration::days(1);
        }
        table_for(&dates)
    }

    #[test]
    fn opening_day_chains_to_prior_event() {
        let table = january_table();
        let events = vec![event(2024, 1, 10), event(2024, 1, 17)];

        // Day after the Jan 10 settlement is Thursday Jan 11, a trading day.
        let opening = resolve_opening_day(date(2024, 1, 17), &events, &table);
        assert_eq!(opening, Some(date(2024, 1, 11)));
    }

    #[test]
    fn opening_day_skips_weekend_after_prior_event() {
        // Prior event on Friday: candidate Saturday snaps to Monday.
        let table = january_table();
        let events = vec![event(2024, 1, 12), event(2024, 1, 19)];
        let opening = resolve_opening_day(date(2024, 1, 19), &events, &table);
        assert_eq!(opening, Some(date(2024, 1, 15)));
    }

    #[test]
    fn first_event_uses_week_lookback() {
        let table = january_table();
        let events = vec![event(2024, 1, 17)];

        // Jan 17 - 7 = Jan 10, a trading Wednesday.
        let opening = resolve_opening_day(date(2024, 1, 17), &events, &table);
        assert_eq!(opening, Some(date(2024, 1, 10)));
    }

    #[test]
    fn opening_day_fails_past_the_event() {
        // Only the event date itself trades after the anchor; candidate
        // snaps onto the event, which is still allowed...
        let table = table_for(&[date(2024, 1, 10), date(2024, 1, 17)]);
        let events = vec![event(2024, 1, 10), event(2024, 1, 17)];
        assert_eq!(
            resolve_opening_day(date(2024, 1, 17), &events, &table),
            Some(date(2024, 1, 17))
        );

        // ...but with no trading day at or before the event, resolution fails.
        let sparse = table_for(&[date(2024, 1, 10), date(2024, 1, 24)]);
        let sparse_events = vec![event(2024, 1, 10), event(2024, 1, 17)];
        assert_eq!(
            resolve_opening_day(date(2024, 1, 17), &sparse_events, &sparse),
            None
        );
    }

    #[test]
    fn previous_day_is_nearest_trading_predecessor() {
        let table = january_table();
        // Jan 15 is a Monday; predecessor of Jan 15 is Friday Jan 12.
        let previous = resolve_previous_day(date(2024, 1, 15), date(2024, 1, 8), &table);
        assert_eq!(previous, Some(date(2024, 1, 12)));
    }

    #[test]
    fn previous_day_fails_before_opening_day() {
        // Gap swallows every trading day between opening and event.
        let table = table_for(&[date(2024, 1, 5), date(2024, 1, 11), date(2024, 1, 17)]);
        let previous = resolve_previous_day(date(2024, 1, 17), date(2024, 1, 12), &table);
        assert_eq!(previous, None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let table = january_table();
        let events = vec![event(2024, 1, 10), event(2024, 1, 17), event(2024, 1, 24)];
        for e in &events {
            let first = resolve_opening_day(e.date, &events, &table);
            let second = resolve_opening_day(e.date, &events, &table);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn benchmark_lookback_snaps_forward_to_first_trading_day() {
        // Week-back candidate Jan 11 is not a trading day; the resolver
        // snaps forward to Jan 15, still before the target.
        let table = table_for(&[date(2024, 1, 15), date(2024, 1, 18)]);
        let opening = resolve_lookback_opening_day(date(2024, 1, 18), &table);
        assert_eq!(opening, Some(date(2024, 1, 15)));
    }

    #[test]
    fn benchmark_lookback_is_strictly_before_target() {
        let table = table_for(&[date(2024, 1, 18)]);
        assert_eq!(resolve_lookback_opening_day(date(2024, 1, 18), &table), None);
    }
}
