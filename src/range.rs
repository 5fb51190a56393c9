// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Ranges of calendar dates.
//!
//! A [`DateRange`] states its boundary policy explicitly: either the last
//! day is included ([`DateRange::of_closed`]) or the end is the first day
//! after the range ([`DateRange::of`]).  No end-of-day instant is ever
//! invented; mapping to the time line goes through the start of the day
//! after the last day.

use std::fmt;
use std::str::FromStr;

use crate::error::{TimeError, TimeResult};
use crate::{CivilDate, Interval, ZoneId, ZonedDateTime};

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

/// A range of dates with an explicit end policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: CivilDate,
    end: CivilDate,
    end_inclusive: bool,
}

impl DateRange {
    fn checked(start: CivilDate, end: CivilDate, end_inclusive: bool) -> TimeResult<Self> {
        if end < start {
            return Err(TimeError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self {
            start,
            end,
            end_inclusive,
        })
    }

    /// Half-open `[start, end_exclusive)`.
    ///
    /// `start == end_exclusive` gives an empty range.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidRange`] when `end_exclusive` precedes `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempozone::{CivilDate, DateRange};
    ///
    /// let week = DateRange::of(
    ///     CivilDate::of(2021, 3, 22).unwrap(),
    ///     CivilDate::of(2021, 3, 29).unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(week.length_in_days(), 7);
    /// assert!(!week.contains(&CivilDate::of(2021, 3, 29).unwrap()));
    /// ```
    pub fn of(start: CivilDate, end_exclusive: CivilDate) -> TimeResult<Self> {
        Self::checked(start, end_exclusive, false)
    }

    /// Closed `[start, end_inclusive]`; never empty.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidRange`] when `end_inclusive` precedes `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempozone::{CivilDate, DateRange};
    ///
    /// let term = DateRange::of_closed(
    ///     CivilDate::of(2021, 1, 6).unwrap(),
    ///     CivilDate::of(2021, 7, 23).unwrap(),
    /// )
    /// .unwrap();
    /// assert!(term.contains(&CivilDate::of(2021, 7, 23).unwrap()));
    /// assert_eq!(term.to_string(), "2021-01-06..=2021-07-23");
    /// ```
    pub fn of_closed(start: CivilDate, end_inclusive: CivilDate) -> TimeResult<Self> {
        Self::checked(start, end_inclusive, true)
    }

    /// First day of the range, always included unless the range is empty.
    pub fn start(&self) -> CivilDate {
        self.start
    }

    /// The end date as given, interpreted per [`is_end_inclusive`](Self::is_end_inclusive).
    pub fn end(&self) -> CivilDate {
        self.end
    }

    /// `true` for ranges built with [`of_closed`](Self::of_closed).
    pub fn is_end_inclusive(&self) -> bool {
        self.end_inclusive
    }

    /// First day after the range.
    pub fn end_exclusive(&self) -> TimeResult<CivilDate> {
        if self.end_inclusive {
            self.end.plus_days(1)
        } else {
            Ok(self.end)
        }
    }

    /// Last day inside the range, `None` if empty.
    pub fn last_day(&self) -> Option<CivilDate> {
        if self.end_inclusive {
            Some(self.end)
        } else if self.is_empty() {
            None
        } else {
            self.end.plus_days(-1).ok()
        }
    }

    /// Only a half-open range with equal bounds is empty.
    pub fn is_empty(&self) -> bool {
        !self.end_inclusive && self.start == self.end
    }

    /// Whether `date` falls inside, honouring the end policy.
    pub fn contains(&self, date: &CivilDate) -> bool {
        let before_end = if self.end_inclusive {
            *date <= self.end
        } else {
            *date < self.end
        };
        self.start <= *date && before_end
    }

    /// Number of days the range covers.
    pub fn length_in_days(&self) -> i64 {
        self.start.days_until(&self.end) + i64::from(self.end_inclusive)
    }

    /// Every day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = CivilDate> + '_ {
        let mut next = (!self.is_empty()).then_some(self.start);
        std::iter::from_fn(move || {
            let day = next?;
            next = day.plus_days(1).ok().filter(|d| self.contains(d));
            Some(day)
        })
    }

    /// The instants from the start of the first day up to the start of the
    /// day after the last day, both taken in `zone`.
    pub fn to_interval(&self, zone: &ZoneId) -> TimeResult<Interval> {
        let start = ZonedDateTime::start_of_day(self.start, zone.clone()).to_instant();
        let end = ZonedDateTime::start_of_day(self.end_exclusive()?, zone.clone()).to_instant();
        Interval::new(start, end)
    }
}

/// `start..end` when half-open, `start..=end` when closed.
impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.end_inclusive { "..=" } else { ".." };
        write!(f, "{}{op}{}", self.start, self.end)
    }
}

impl FromStr for DateRange {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end, inclusive) = if let Some((a, b)) = s.split_once("..=") {
            (a, b, true)
        } else if let Some((a, b)) = s.split_once("..") {
            (a, b, false)
        } else {
            return Err(TimeError::format(s, "expected '..' or '..='"));
        };
        Self::checked(start.parse()?, end.parse()?, inclusive)
    }
}

#[cfg(feature = "serde")]
impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("DateRange", 3)?;
        s.serialize_field("start", &self.start)?;
        s.serialize_field("end", &self.end)?;
        s.serialize_field("end_inclusive", &self.end_inclusive)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: CivilDate,
            end: CivilDate,
            end_inclusive: bool,
        }

        let raw = Raw::deserialize(deserializer)?;
        DateRange::checked(raw.start, raw.end, raw.end_inclusive).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> CivilDate {
        text.parse().unwrap()
    }

    #[test]
    fn test_closed_versus_half_open() {
        let closed = DateRange::of_closed(date("2021-01-06"), date("2021-07-23")).unwrap();
        assert!(closed.contains(&date("2021-01-06")));
        assert!(closed.contains(&date("2021-07-23")));
        assert!(!closed.contains(&date("2021-07-24")));
        assert!(!closed.contains(&date("2021-01-05")));

        let open = DateRange::of(date("2021-01-06"), date("2021-07-23")).unwrap();
        assert!(open.contains(&date("2021-07-22")));
        assert!(!open.contains(&date("2021-07-23")));
    }

    #[test]
    fn test_rejects_reversed() {
        assert!(matches!(
            DateRange::of(date("2021-02-01"), date("2021-01-31")),
            Err(TimeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_lengths_and_bounds() {
        let closed = DateRange::of_closed(date("2021-02-27"), date("2021-03-01")).unwrap();
        assert_eq!(closed.length_in_days(), 3);
        assert_eq!(closed.end_exclusive().unwrap(), date("2021-03-02"));
        assert_eq!(closed.last_day(), Some(date("2021-03-01")));

        let single = DateRange::of_closed(date("2021-02-27"), date("2021-02-27")).unwrap();
        assert_eq!(single.length_in_days(), 1);
        assert!(!single.is_empty());

        let empty = DateRange::of(date("2021-02-27"), date("2021-02-27")).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.length_in_days(), 0);
        assert_eq!(empty.last_day(), None);
        assert_eq!(empty.days().count(), 0);
    }

    #[test]
    fn test_days_iterator() {
        let range = DateRange::of(date("2020-02-27"), date("2020-03-02")).unwrap();
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
        assert_eq!(days, ["2020-02-27", "2020-02-28", "2020-02-29", "2020-03-01"]);
    }

    #[test]
    fn test_to_interval_uses_start_of_next_day() {
        let warsaw = ZoneId::of("Europe/Warsaw").unwrap();
        let weekend = DateRange::of_closed(date("2021-03-27"), date("2021-03-28")).unwrap();
        let interval = weekend.to_interval(&warsaw).unwrap();
        assert_eq!(interval.start().to_string(), "2021-03-26T23:00:00Z");
        assert_eq!(interval.end().to_string(), "2021-03-28T22:00:00Z");
        // 48 wall-clock hours minus the skipped hour.
        assert_eq!(interval.duration(), crate::Duration::of_hours(47));
    }

    #[test]
    fn test_text() {
        let closed = DateRange::of_closed(date("2021-01-06"), date("2021-07-23")).unwrap();
        assert_eq!(closed.to_string(), "2021-01-06..=2021-07-23");
        assert_eq!("2021-01-06..=2021-07-23".parse::<DateRange>().unwrap(), closed);
        let open: DateRange = "2021-01-06..2021-07-23".parse().unwrap();
        assert!(!open.is_end_inclusive());
        assert!("2021-01-06/2021-07-23".parse::<DateRange>().is_err());
        assert!("2021-07-23..2021-01-06".parse::<DateRange>().is_err());
    }
}
