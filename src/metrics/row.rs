/// Core data model: one day of repository metrics and the selectable windows.
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MetricRow
// ---------------------------------------------------------------------------

/// A single day's snapshot of repository activity.
///
/// Field names match the endpoint's JSON properties exactly. `date` is
/// (de)serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub date: NaiveDate,
    /// Commits recorded that day.
    pub commits: u64,
    /// Cumulative fork count.
    pub forks: u64,
    pub open_issues: u64,
    /// Cumulative star count.
    pub stars: u64,
    /// Dominant language label for the day.
    pub top_lang: String,
    pub watchers: u64,
    /// Repository size in KB.
    pub size_kb: u64,
}

impl MetricRow {
    /// Read one numeric field.
    pub fn value(&self, field: MetricField) -> u64 {
        match field {
            MetricField::Commits => self.commits,
            MetricField::Forks => self.forks,
            MetricField::OpenIssues => self.open_issues,
            MetricField::Stars => self.stars,
            MetricField::Watchers => self.watchers,
            MetricField::SizeKb => self.size_kb,
        }
    }
}

// ---------------------------------------------------------------------------
// MetricField
// ---------------------------------------------------------------------------

/// The numeric columns of a [`MetricRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Commits,
    Forks,
    OpenIssues,
    Stars,
    Watchers,
    SizeKb,
}

impl MetricField {
    pub const ALL: [MetricField; 6] = [
        Self::Commits,
        Self::Forks,
        Self::OpenIssues,
        Self::Stars,
        Self::Watchers,
        Self::SizeKb,
    ];

    /// Wire name of the field.
    pub fn key(self) -> &'static str {
        match self {
            Self::Commits => "commits",
            Self::Forks => "forks",
            Self::OpenIssues => "open_issues",
            Self::Stars => "stars",
            Self::Watchers => "watchers",
            Self::SizeKb => "size_kb",
        }
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// A selectable trailing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateRange {
    Week,
    Fortnight,
    #[default]
    Month,
}

impl DateRange {
    /// All options, in display order.
    pub const ALL: [DateRange; 3] = [Self::Week, Self::Fortnight, Self::Month];

    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Fortnight => 14,
            Self::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "7 Days",
            Self::Fortnight => "14 Days",
            Self::Month => "30 Days",
        }
    }

    /// Map a day count to its window, if it is one of the supported ones.
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(Self::Week),
            14 => Some(Self::Fortnight),
            30 => Some(Self::Month),
            _ => None,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateRange {
    type Err = String;

    /// Accepts `7`, `14`, `30`, optionally suffixed with `d`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix('d')
            .or_else(|| trimmed.strip_suffix('D'))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_days)
            .ok_or_else(|| format!("unsupported window '{s}' (expected 7, 14 or 30)"))
    }
}

impl Serialize for DateRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.days())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = u32::deserialize(deserializer)?;
        Self::from_days(days).ok_or_else(|| {
            serde::de::Error::custom(format!("unsupported window {days} (expected 7, 14 or 30)"))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
