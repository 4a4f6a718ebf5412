//! Synthetic metrics series.
//!
//! Keeps the dashboard populated when no endpoint is configured or the
//! endpoint fails. The values are toy data drawn from fixed ranges; nothing
//! downstream should treat them as real.

use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;

use super::row::MetricRow;

/// Languages the synthetic `top_lang` is drawn from.
pub const LANGUAGES: [&str; 5] = ["JavaScript", "TypeScript", "Python", "Java", "Go"];

pub const COMMITS: RangeInclusive<u64> = 1..=15;
pub const FORKS: RangeInclusive<u64> = 10..=14;
pub const OPEN_ISSUES: RangeInclusive<u64> = 2..=9;
pub const STARS: RangeInclusive<u64> = 50..=70;
pub const WATCHERS: RangeInclusive<u64> = 15..=25;
pub const SIZE_KB: RangeInclusive<u64> = 5000..=6000;

/// Generate `days` rows, one per calendar day ending at `today` inclusive,
/// oldest first.
pub fn generate<R: Rng>(days: u32, today: NaiveDate, rng: &mut R) -> Vec<MetricRow> {
    (0..days)
        .map(|idx| {
            let back = u64::from(days - 1 - idx);
            let date = today.checked_sub_days(Days::new(back)).unwrap_or(today);
            MetricRow {
                date,
                commits: rng.gen_range(COMMITS),
                forks: rng.gen_range(FORKS),
                open_issues: rng.gen_range(OPEN_ISSUES),
                stars: rng.gen_range(STARS),
                top_lang: LANGUAGES
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or(LANGUAGES[0])
                    .to_string(),
                watchers: rng.gen_range(WATCHERS),
                size_kb: rng.gen_range(SIZE_KB),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
