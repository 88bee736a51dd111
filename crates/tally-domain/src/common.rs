//! Shared traits, time utilities, and enums for expense tracking primitives.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Associates entities with a category name.
pub trait Categorized {
    fn category(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Rolling window used by a [`crate::RollingBudget`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl BudgetPeriod {
    /// First calendar day of the period containing `today`.
    ///
    /// Weeks start on Sunday.
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        match self {
            BudgetPeriod::Daily => today,
            BudgetPeriod::Weekly => {
                let delta = today.weekday().num_days_from_sunday() as i64;
                today - Duration::days(delta)
            }
            BudgetPeriod::Monthly => today - Duration::days(today.day0() as i64),
        }
    }

    /// Midnight UTC at the start of the period containing `now`.
    pub fn start_of(self, now: DateTime<Utc>) -> DateTime<Utc> {
        start_of_day(self.start_date(now.date_naive()))
    }

    /// Number of days covered by the period containing `today`.
    pub fn days_in_period(self, today: NaiveDate) -> u32 {
        match self {
            BudgetPeriod::Daily => 1,
            BudgetPeriod::Weekly => 7,
            BudgetPeriod::Monthly => days_in_month(today.year(), today.month()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetPeriod::Daily => "Daily",
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Monthly => "Monthly",
        };
        f.write_str(label)
    }
}

impl FromStr for BudgetPeriod {
    type Err = ParseValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(BudgetPeriod::Daily),
            "weekly" | "week" => Ok(BudgetPeriod::Weekly),
            "monthly" | "month" => Ok(BudgetPeriod::Monthly),
            other => Err(ParseValueError::new("budget period", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when a textual value does not name a known variant.
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl ParseValueError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ParseValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for ParseValueError {}

/// Parses an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` value, or a bare
/// `YYYY-MM-DD` date. Naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

/// Midnight UTC on the given date.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::default()), Utc)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(first_next)) => (first_next - first).num_days() as u32,
        _ => 30,
    }
}
