//! Calendar-day normalization.
//!
//! Dates arrive from the data layer as ISO-8601 date or date-time strings (and,
//! from older servers, RFC 2822 strings). The engine only ever compares whole
//! local calendar days, so everything is reduced to a [`Date`] in the caller's
//! time zone before any arithmetic happens.

use std::{fmt, str::FromStr};

use jiff::{
    civil::{self, Date, DateTime},
    tz::TimeZone,
    Timestamp, Zoned,
};
use serde::{Deserialize, Serialize};

use crate::error::{GardenError, Result};

/// Normalizes a raw date or date-time string to a local calendar day.
///
/// Instants (strings carrying `Z` or an offset) are converted into `tz` first,
/// so `2024-01-01T23:30:00Z` is January 2nd in Tokyo. Civil date-times keep
/// their wall-clock date. Returns `None` for blank or unparseable input; the
/// caller decides what a missing day means.
///
/// # Examples
///
/// ```rust
/// use jiff::{civil::date, tz::TimeZone};
/// use verdant_core::dates::parse_day;
///
/// let tz = TimeZone::UTC;
/// assert_eq!(parse_day("2024-01-05", &tz), Some(date(2024, 1, 5)));
/// assert_eq!(parse_day("2024-01-05T18:00:00", &tz), Some(date(2024, 1, 5)));
/// assert_eq!(parse_day("not a date", &tz), None);
/// ```
pub fn parse_day(raw: &str, tz: &TimeZone) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts.to_zoned(tz.clone()).date());
    }
    if let Ok(zoned) = raw.parse::<Zoned>() {
        return Some(zoned.with_time_zone(tz.clone()).date());
    }
    if let Ok(dt) = raw.parse::<DateTime>() {
        return Some(dt.date());
    }
    if let Ok(day) = raw.parse::<Date>() {
        return Some(day);
    }
    if let Ok(zoned) = jiff::fmt::rfc2822::parse(raw) {
        return Some(zoned.with_time_zone(tz.clone()).date());
    }

    log::debug!("unparseable date '{raw}'");
    None
}

/// Like [`parse_day`] but for optional stamps.
pub fn parse_optional_day(raw: Option<&str>, tz: &TimeZone) -> Option<Date> {
    raw.and_then(|raw| parse_day(raw, tz))
}

/// Whole calendar days from `from` to `to`. Negative when `from` is later.
pub fn days_between(from: Date, to: Date) -> Option<i64> {
    from.until(to).ok().map(|span| i64::from(span.get_days()))
}

/// Formats a day as a `YYYY-MM-DD` key.
pub fn day_key(day: Date) -> String {
    day.strftime("%Y-%m-%d").to_string()
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarMonth {
    year: i16,
    month: i8,
}

impl CalendarMonth {
    /// Creates a month, validating the year and month number.
    pub fn new(year: i16, month: i8) -> Result<Self> {
        Date::new(year, month, 1).map_err(|e| {
            GardenError::invalid_input("month").with_reason(format!("{year:04}-{month:02}: {e}"))
        })?;
        Ok(Self { year, month })
    }

    /// The month a day belongs to.
    pub fn containing(day: Date) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn year(&self) -> i16 {
        self.year
    }

    pub fn month(&self) -> i8 {
        self.month
    }

    pub fn first_day(&self) -> Date {
        civil::date(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Date {
        self.first_day().last_of_month()
    }

    /// Whether `day` falls inside this month.
    pub fn contains(&self, day: Date) -> bool {
        day.year() == self.year && day.month() == self.month
    }

    /// The following month. Stays put at the end of the supported range.
    pub fn next(&self) -> Self {
        let (year, month) = if self.month == 12 {
            (self.year.saturating_add(1), 1)
        } else {
            (self.year, self.month + 1)
        };
        Self::new(year, month).unwrap_or(*self)
    }

    /// The preceding month. Stays put at the start of the supported range.
    pub fn previous(&self) -> Self {
        let (year, month) = if self.month == 1 {
            (self.year.saturating_sub(1), 12)
        } else {
            (self.year, self.month - 1)
        };
        Self::new(year, month).unwrap_or(*self)
    }

    /// Human-readable label, e.g. `March 2024`.
    pub fn label(&self) -> String {
        self.first_day().strftime("%B %Y").to_string()
    }
}

impl FromStr for CalendarMonth {
    type Err = GardenError;

    /// Parses `YYYY-MM`. A full date is also accepted and yields its month.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || {
            GardenError::invalid_input("month").with_reason(format!("expected YYYY-MM, got '{s}'"))
        };

        if let Ok(day) = s.parse::<Date>() {
            return Ok(Self::containing(day));
        }

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i16>().map_err(|_| invalid())?;
        let month = month.parse::<i8>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for CalendarMonth {
    type Error = GardenError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CalendarMonth> for String {
    fn from(month: CalendarMonth) -> Self {
        month.to_string()
    }
}
