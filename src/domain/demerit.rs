//! Demerit points and licence suspension.
//!
//! Points are recorded per offence. A person is suspended when the points
//! they accrued in the 24 months ending at their latest offence exceed a
//! threshold that depends on their age.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;

use crate::domain::date::CalendarDate;

/// Drivers younger than this are held to the lower threshold.
pub const ADULT_AGE: i64 = 21;

/// Points allowed in the window before a driver under 21 is suspended.
pub const UNDER_21_LIMIT: u32 = 6;

/// Points allowed in the window before a driver aged 21 or over is suspended.
pub const ADULT_LIMIT: u32 = 12;

/// Points for a single offence, a whole number from 1 to 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DemeritPoints(u8);

impl DemeritPoints {
    /// Smallest valid value.
    pub const MIN: u8 = 1;
    /// Largest valid value.
    pub const MAX: u8 = 6;

    /// Returns the number of points.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for DemeritPoints {
    type Error = InvalidPoints;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or_else(|| InvalidPoints(value.to_string()))
    }
}

impl FromStr for DemeritPoints {
    type Err = InvalidPoints;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map_err(|_| InvalidPoints(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for DemeritPoints {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when points are not a whole number between 1 and 6.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid demerit points '{0}': expected a whole number from 1 to 6")]
pub struct InvalidPoints(String);

/// A single recorded offence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Offence {
    /// When the offence happened.
    pub date: CalendarDate,
    /// Points incurred.
    pub points: DemeritPoints,
}

/// The result of assessing someone's offences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Points in the 24 months ending at the latest offence.
    pub window_total: u32,
    /// The total that must be exceeded to suspend.
    pub limit: u32,
    /// Whether the licence is suspended.
    pub suspended: bool,
}

/// Assess a set of offences for a person of the given age.
///
/// An unknown age is treated as under 21. The window covers the latest
/// offence date and the 24 months before it, inclusive at both ends.
#[must_use]
pub fn assess(offences: &[Offence], age: Option<i64>) -> Standing {
    let limit = match age {
        Some(age) if age >= ADULT_AGE => ADULT_LIMIT,
        _ => UNDER_21_LIMIT,
    };

    let window_total = offences
        .iter()
        .map(|o| o.date)
        .max()
        .map_or(0, |latest| {
            let start = latest.two_years_before();
            offences
                .iter()
                .filter(|o| o.date >= start)
                .map(|o| u32::from(o.points.get()))
                .sum()
        });

    Standing {
        window_total,
        limit,
        suspended: window_total > limit,
    }
}

/// Total points per offence date.
#[must_use]
pub fn points_by_date(offences: &[Offence]) -> BTreeMap<CalendarDate, u32> {
    let mut map = BTreeMap::new();
    for offence in offences {
        *map.entry(offence.date).or_default() += u32::from(offence.points.get());
    }
    map
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn offence(date: &str, points: i64) -> Offence {
        Offence {
            date: date.parse().unwrap(),
            points: DemeritPoints::try_from(points).unwrap(),
        }
    }

    #[test_case("1", 1; "min")]
    #[test_case("6", 6; "max")]
    #[test_case("3", 3; "middle")]
    fn parses_points(s: &str, expected: u8) {
        assert_eq!(s.parse::<DemeritPoints>().unwrap().get(), expected);
    }

    #[test_case("0"; "zero")]
    #[test_case("7"; "seven")]
    #[test_case("-1"; "negative")]
    #[test_case("2.5"; "fraction")]
    #[test_case("three"; "word")]
    #[test_case(""; "empty")]
    #[test_case("300"; "overflows u8")]
    fn rejects_points(s: &str) {
        assert_eq!(
            s.parse::<DemeritPoints>(),
            Err(InvalidPoints(s.to_string()))
        );
    }

    #[test]
    fn no_offences_is_not_suspended() {
        let standing = assess(&[], Some(30));
        assert_eq!(standing.window_total, 0);
        assert!(!standing.suspended);
    }

    #[test_case(20, 7, true; "under 21 over six")]
    #[test_case(20, 6, false; "under 21 at six")]
    #[test_case(21, 7, false; "adult over six")]
    #[test_case(21, 12, false; "adult at twelve")]
    #[test_case(21, 13, true; "adult over twelve")]
    fn thresholds_depend_on_age(age: i64, total: i64, suspended: bool) {
        let mut offences = Vec::new();
        let mut remaining = total;
        let mut month = 1;
        while remaining > 0 {
            let points = remaining.min(6);
            offences.push(offence(&format!("01-{month:02}-2024"), points));
            remaining -= points;
            month += 1;
        }

        let standing = assess(&offences, Some(age));
        assert_eq!(i64::from(standing.window_total), total);
        assert_eq!(standing.suspended, suspended);
    }

    #[test]
    fn unknown_age_uses_lower_limit() {
        let offences = [offence("01-01-2024", 4), offence("01-02-2024", 3)];
        let standing = assess(&offences, None);
        assert_eq!(standing.limit, UNDER_21_LIMIT);
        assert!(standing.suspended);
    }

    #[test]
    fn window_is_anchored_at_latest_offence() {
        let offences = [
            offence("09-06-2022", 6),
            offence("10-06-2022", 3),
            offence("01-01-2024", 2),
            offence("10-06-2024", 2),
        ];
        let standing = assess(&offences, Some(40));
        // 09-06-2022 falls a day before the window
        assert_eq!(standing.window_total, 7);
    }

    #[test]
    fn backdated_offence_does_not_move_window() {
        let offences = [offence("10-06-2024", 5), offence("01-01-2019", 6)];
        let standing = assess(&offences, Some(19));
        assert_eq!(standing.window_total, 5);
        assert!(!standing.suspended);
    }

    #[test]
    fn points_by_date_sums_same_day() {
        let offences = [
            offence("01-01-2024", 2),
            offence("01-01-2024", 3),
            offence("02-01-2024", 1),
        ];
        let map = points_by_date(&offences);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&"01-01-2024".parse::<CalendarDate>().unwrap()], 5);
    }
}
