//! Deterministic synthetic bar generation for testing and development.
//!
//! Produces a weekday random walk with both a regular and an after-hours
//! session per trading day. Results on synthetic data are clearly fake and
//! must be tagged as such by the caller.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Bar, Session};

/// Generate synthetic session bars for `[start, end]`, skipping weekends.
///
/// The walk is seeded from `label` via BLAKE3, so the same label and date
/// range always produce the same bars.
pub fn generate_synthetic_bars(label: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(label.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 17_000.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == Weekday::Sat || weekday == Weekday::Sun {
            current += Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.02..0.02);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.008));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.008));
        let volume = rng.gen_range(50_000..250_000u64);

        bars.push(Bar {
            date: current,
            session: Session::Regular,
            open,
            high,
            low,
            close,
            volume,
        });

        // Thinner after-hours session drifting off the day close.
        let night_return: f64 = rng.gen_range(-0.01..0.01);
        let night_open = close;
        let night_close = close * (1.0 + night_return);
        bars.push(Bar {
            date: current,
            session: Session::AfterHours,
            open: night_open,
            high: night_open.max(night_close) * (1.0 + rng.gen_range(0.0..0.004)),
            low: night_open.min(night_close) * (1.0 - rng.gen_range(0.0..0.004)),
            close: night_close,
            volume: volume / 10,
        });

        price = night_close;
        current += Duration::days(1);
    }

    bars
}
