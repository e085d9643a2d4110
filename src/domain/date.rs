use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

const FORMAT: &str = "%d-%m-%Y";

const MILLIS_PER_YEAR: i64 = 1000 * 60 * 60 * 24 * 365;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").expect("pattern is a valid regex")
});

/// A calendar date written strictly as `DD-MM-YYYY`.
///
/// Used for birthdates and offence dates. Parsing is not lenient: both the
/// digit widths and the calendar must be valid, so `1-1-1990` and
/// `31-02-2000` are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Wraps an already valid date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Midnight UTC at the start of this date.
    #[must_use]
    pub fn start_of_day(self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// The date 24 months before this one.
    ///
    /// Clamps to the last day of the month when the day does not exist
    /// (`29-02-2024` goes to `28-02-2022`).
    #[must_use]
    pub fn two_years_before(self) -> Self {
        self.0
            .checked_sub_months(Months::new(24))
            .map_or(Self(NaiveDate::MIN), Self)
    }
}

/// Age in whole years of someone born on `birth`, as observed at `now`.
///
/// Elapsed milliseconds divided by the length of a 365-day year, truncated
/// toward zero. Leap days are not accounted for, so the result can lag the
/// calendar age by a day or two around birthdays.
#[must_use]
pub fn age_in_years(birth: CalendarDate, now: DateTime<Utc>) -> i64 {
    let elapsed = now.timestamp_millis() - birth.start_of_day().timestamp_millis();
    elapsed / MILLIS_PER_YEAR
}

impl FromStr for CalendarDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !PATTERN.is_match(s) {
            return Err(InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, FORMAT)
            .map(Self)
            .map_err(|_| InvalidDate(s.to_string()))
    }
}

impl TryFrom<&str> for CalendarDate {
    type Error = InvalidDate;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = InvalidDate;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

/// Error returned when a string is not a real date in `DD-MM-YYYY` form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid date '{0}': expected a real calendar date formatted as DD-MM-YYYY")]
pub struct InvalidDate(String);
