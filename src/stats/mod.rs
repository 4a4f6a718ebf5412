//! Derived statistics over a metrics series.
//!
//! Pure functions feeding the dashboard cards and the language chart:
//! - **latest**: last value of a field, `0` for an empty series
//! - **total**: sum of a field across the series
//! - **trend**: signed percent change between the two most recent rows
//!
//! Percentages are rounded with [`f64::round`], i.e. half away from zero
//! (`2.5 → 3`, `-2.5 → -3`).

use serde::Serialize;

use crate::metrics::{MetricField, MetricRow};

// ---------------------------------------------------------------------------
// Field aggregates
// ---------------------------------------------------------------------------

/// Value of `field` in the last row, or `0` if `series` is empty.
pub fn latest(series: &[MetricRow], field: MetricField) -> u64 {
    series.last().map(|row| row.value(field)).unwrap_or(0)
}

/// Sum of `field` across all rows, saturating at `u64::MAX`.
pub fn total(series: &[MetricRow], field: MetricField) -> u64 {
    series
        .iter()
        .map(|row| row.value(field))
        .fold(0, u64::saturating_add)
}

/// Percent change of `field` between the last two rows.
///
/// Returns `0` when there are fewer than two rows or the previous value is
/// zero.
pub fn trend(series: &[MetricRow], field: MetricField) -> i64 {
    let [.., prev, now] = series else {
        return 0;
    };

    let prev = prev.value(field);
    let now = now.value(field);
    if prev == 0 {
        return 0;
    }

    let change = (now as f64 - prev as f64) / prev as f64 * 100.0;
    change.round() as i64
}

// ---------------------------------------------------------------------------
// Summary cards
// ---------------------------------------------------------------------------

/// A dashboard headline number with its trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub field: MetricField,
    pub value: u64,
    /// Display form of `value` (`1.2K`, `5400 KB`, ...).
    pub display: String,
    pub trend: i64,
}

/// How a card turns its field into a number.
#[derive(Clone, Copy)]
enum Aggregate {
    Total,
    Latest,
}

const CARDS: [(&str, MetricField, Aggregate); 6] = [
    ("Total Commits", MetricField::Commits, Aggregate::Total),
    ("Stars", MetricField::Stars, Aggregate::Latest),
    ("Forks", MetricField::Forks, Aggregate::Latest),
    ("Watchers", MetricField::Watchers, Aggregate::Latest),
    ("Open Issues", MetricField::OpenIssues, Aggregate::Latest),
    ("Repository Size", MetricField::SizeKb, Aggregate::Latest),
];

/// Build the six summary cards, in display order.
pub fn summary_cards(series: &[MetricRow]) -> Vec<StatCard> {
    CARDS
        .iter()
        .map(|&(title, field, aggregate)| {
            let value = match aggregate {
                Aggregate::Total => total(series, field),
                Aggregate::Latest => latest(series, field),
            };
            // Size reads better unabbreviated with its unit.
            let display = match field {
                MetricField::SizeKb => format!("{value} KB"),
                _ => format_compact(value),
            };
            StatCard {
                title,
                field,
                value,
                display,
                trend: trend(series, field),
            }
        })
        .collect()
}

/// Abbreviate large numbers: `1_500 → "1.5K"`, `2_000_000 → "2.0M"`.
pub fn format_compact(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render a trend as `+12%`, `-3%` or `0%`.
pub fn format_trend(trend: i64) -> String {
    if trend > 0 {
        format!("+{trend}%")
    } else {
        format!("{trend}%")
    }
}

// ---------------------------------------------------------------------------
// Language mix
// ---------------------------------------------------------------------------

/// Number of days each language was dominant, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub days: u64,
}

pub fn language_distribution(series: &[MetricRow]) -> Vec<LanguageShare> {
    let mut shares: Vec<LanguageShare> = Vec::new();
    for row in series {
        match shares.iter_mut().find(|s| s.language == row.top_lang) {
            Some(share) => share.days += 1,
            None => shares.push(LanguageShare {
                language: row.top_lang.clone(),
                days: 1,
            }),
        }
    }
    shares
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
