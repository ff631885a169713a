#![forbid(unsafe_code)]

//! Canonical calendar-day identifiers.
//!
//! A [`DateKey`] names one calendar day and renders as a zero-padded
//! `YYYY-MM-DD` string. It is the identity used for day cells, selection
//! sets, and timesheet entries.
//!
//! # Invariants
//!
//! 1. Every `DateKey` denotes a real calendar day in years `0000..=9999`.
//! 2. `Display` always yields exactly ten characters, so string order and
//!    chronological order agree.
//! 3. `Ord` is chronological.
//!
//! # Range walking
//!
//! [`DateKey::range`] enumerates days between two keys inclusively, in
//! chronological order regardless of argument order. Stepping uses calendar
//! arithmetic on [`NaiveDate`], so month ends, leap days, and year ends are
//! crossed correctly:
//!
//! ```
//! use wg_core::DateKey;
//!
//! let a: DateKey = "2025-02-02".parse().unwrap();
//! let b: DateKey = "2025-01-30".parse().unwrap();
//! let days: Vec<String> = DateKey::range(a, b).map(|d| d.to_string()).collect();
//! assert_eq!(days, ["2025-01-30", "2025-01-31", "2025-02-01", "2025-02-02"]);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lowest year representable as a four-digit key.
pub const MIN_YEAR: i32 = 0;
/// Highest year representable as a four-digit key.
pub const MAX_YEAR: i32 = 9999;

/// Error returned when a string or date cannot become a [`DateKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateKeyError {
    /// Input is not shaped like `YYYY-MM-DD`.
    #[error("malformed date key {input:?}: expected YYYY-MM-DD")]
    Format {
        /// The rejected input.
        input: String,
    },
    /// Input is well formed but names no calendar day (e.g. `2025-02-30`).
    #[error("no such calendar day: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Parsed year.
        year: i32,
        /// Parsed month.
        month: u32,
        /// Parsed day.
        day: u32,
    },
    /// Year cannot be written with four digits.
    #[error("year {year} outside supported range {MIN_YEAR}..={MAX_YEAR}")]
    YearOutOfRange {
        /// The rejected year.
        year: i32,
    },
}

/// A calendar day, displayed as `YYYY-MM-DD`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parse a canonical `YYYY-MM-DD` string.
    ///
    /// Only the zero-padded form is accepted; `2025-1-5` and
    /// `2025-01-05T00:00` are rejected.
    pub fn parse(input: &str) -> Result<Self, DateKeyError> {
        let bytes = input.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shaped {
            return Err(DateKeyError::Format {
                input: input.to_owned(),
            });
        }

        // Shape check guarantees these slices are ASCII digits.
        let number = |range: std::ops::Range<usize>| -> Result<u32, DateKeyError> {
            input[range].parse().map_err(|_| DateKeyError::Format {
                input: input.to_owned(),
            })
        };
        let year = number(0..4)? as i32;
        let month = number(5..7)?;
        let day = number(8..10)?;
        Self::from_ymd(year, month, day)
    }

    /// Build a key from year, month (1-12), and day (1-31).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateKeyError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateKeyError::YearOutOfRange { year });
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateKeyError::InvalidDate { year, month, day })
    }

    /// Wrap an existing calendar date.
    pub fn from_date(date: NaiveDate) -> Result<Self, DateKeyError> {
        let year = date.year();
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateKeyError::YearOutOfRange { year });
        }
        Ok(Self(date))
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// The following calendar day, or `None` past `9999-12-31`.
    #[must_use]
    pub fn succ(self) -> Option<Self> {
        self.0
            .succ_opt()
            .filter(|d| d.year() <= MAX_YEAR)
            .map(Self)
    }

    /// The preceding calendar day, or `None` before `0000-01-01`.
    #[must_use]
    pub fn pred(self) -> Option<Self> {
        self.0
            .pred_opt()
            .filter(|d| d.year() >= MIN_YEAR)
            .map(Self)
    }

    /// Number of days from `self` to `other` (negative if `other` is earlier).
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Every day between `a` and `b` inclusive, earliest first.
    ///
    /// Argument order does not matter.
    #[must_use]
    pub fn range(a: Self, b: Self) -> DateRange {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        DateRange {
            next: Some(start),
            end,
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl fmt::Debug for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateKey({self})")
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<NaiveDate> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_date(value)
    }
}

impl From<DateKey> for NaiveDate {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Inclusive chronological iterator produced by [`DateKey::range`].
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<DateKey>,
    end: DateKey,
}

impl Iterator for DateRange {
    type Item = DateKey;

    fn next(&mut self) -> Option<DateKey> {
        let current = self.next?;
        self.next = if current < self.end {
            current.succ()
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map_or(0, |n| usize::try_from(n.days_until(self.end) + 1).unwrap_or(0));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}
impl FusedIterator for DateRange {}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    #[test]
    fn parse_and_display_roundtrip() {
        for s in ["2025-01-30", "0000-01-01", "9999-12-31", "2024-02-29"] {
            assert_eq!(key(s).to_string(), s);
        }
    }

    #[test]
    fn rejects_unpadded_and_decorated_input() {
        for bad in [
            "2025-1-30",
            "2025-01-3",
            "25-01-30",
            "2025/01/30",
            "2025-01-30T00:00",
            " 2025-01-30",
            "",
            "+025-01-30",
            "２025-01-30",
        ] {
            assert!(
                matches!(DateKey::parse(bad), Err(DateKeyError::Format { .. })),
                "{bad:?} should be a format error"
            );
        }
    }

    #[test]
    fn rejects_impossible_days() {
        assert_eq!(
            DateKey::parse("2025-02-29"),
            Err(DateKeyError::InvalidDate {
                year: 2025,
                month: 2,
                day: 29
            })
        );
        assert!(DateKey::parse("2025-13-01").is_err());
        assert!(DateKey::parse("2025-00-10").is_err());
        assert!(DateKey::parse("2025-04-31").is_err());
    }

    #[test]
    fn from_ymd_rejects_five_digit_years() {
        assert_eq!(
            DateKey::from_ymd(10_000, 1, 1),
            Err(DateKeyError::YearOutOfRange { year: 10_000 })
        );
        assert!(DateKey::from_ymd(-1, 1, 1).is_err());
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(key("2024-12-31") < key("2025-01-01"));
        assert!(key("2025-01-09") < key("2025-01-10"));
        assert!(key("2025-09-30") < key("2025-10-01"));
    }

    #[test]
    fn succ_crosses_boundaries() {
        assert_eq!(key("2025-01-31").succ(), Some(key("2025-02-01")));
        assert_eq!(key("2024-02-28").succ(), Some(key("2024-02-29")));
        assert_eq!(key("2024-12-31").succ(), Some(key("2025-01-01")));
        assert_eq!(key("9999-12-31").succ(), None);
        assert_eq!(key("0000-01-01").pred(), None);
    }

    #[test]
    fn range_crosses_month_boundary() {
        let days: Vec<_> = DateKey::range(key("2025-01-30"), key("2025-02-02")).collect();
        assert_eq!(
            days,
            vec![
                key("2025-01-30"),
                key("2025-01-31"),
                key("2025-02-01"),
                key("2025-02-02")
            ]
        );
    }

    #[test]
    fn range_is_order_independent() {
        let forward: Vec<_> = DateKey::range(key("2024-12-29"), key("2025-01-02")).collect();
        let backward: Vec<_> = DateKey::range(key("2025-01-02"), key("2024-12-29")).collect();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 5);
    }

    #[test]
    fn range_single_day() {
        let d = key("2025-03-15");
        let days: Vec<_> = DateKey::range(d, d).collect();
        assert_eq!(days, vec![d]);
    }

    #[test]
    fn range_at_upper_limit_terminates() {
        let days: Vec<_> = DateKey::range(key("9999-12-30"), key("9999-12-31")).collect();
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn range_size_hint_is_exact() {
        let range = DateKey::range(key("2024-02-01"), key("2024-03-01"));
        assert_eq!(range.len(), 30);
        assert_eq!(range.count(), 30);
    }

    #[test]
    fn days_until_is_signed() {
        assert_eq!(key("2025-01-01").days_until(key("2025-01-31")), 30);
        assert_eq!(key("2025-01-31").days_until(key("2025-01-01")), -30);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let d = key("2025-07-04");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2025-07-04\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<DateKey>("\"2025-7-4\"").is_err());
    }

    #[test]
    fn error_messages_name_the_input() {
        let err = DateKey::parse("07/04/2025").unwrap_err();
        assert!(err.to_string().contains("07/04/2025"));
        let err = DateKey::parse("2025-02-30").unwrap_err();
        assert_eq!(err.to_string(), "no such calendar day: 2025-02-30");
    }
}
