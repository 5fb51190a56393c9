// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Half-open intervals over instant-like values.
//!
//! This module provides:
//! - [`Interval<T>`]: `[start, end)` over any [`TimeInstant`], [`Instant`] by default
//! - [`complement_within`] and [`intersect_intervals`] over sorted interval lists

use qtty::Days;
use std::fmt;

use crate::error::{TimeError, TimeResult};
use crate::{CivilDateTime, Duration, Instant, TimeInstant};

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

/// A half-open interval `[start, end)` between two instants.
///
/// `start <= end` always holds; an interval with `start == end` is empty and
/// contains nothing.
///
/// # Examples
///
/// ```
/// use tempozone::{Instant, Interval};
///
/// let start = Instant::parse("2021-03-27T12:00:00Z").unwrap();
/// let end = Instant::parse("2021-03-28T11:00:00Z").unwrap();
/// let interval = Interval::new(start, end).unwrap();
///
/// assert!(interval.contains(&start));
/// assert!(!interval.contains(&end));
/// assert_eq!(interval.to_string(), "2021-03-27T12:00:00Z/2021-03-28T11:00:00Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<T: TimeInstant = Instant> {
    start: T,
    end: T,
}

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval; fails with [`TimeError::InvalidRange`] if
    /// `end` is before `start`.
    pub fn new(start: T, end: T) -> TimeResult<Self> {
        if end < start {
            return Err(TimeError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Callers guarantee `start <= end`.
    fn ordered(start: T, end: T) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub fn end(&self) -> T {
        self.end
    }

    /// Returns the duration of the interval as the difference between end and start.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start <= value < end`.
    pub fn contains(&self, value: &T) -> bool {
        self.start <= *value && *value < self.end
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn encloses(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two intervals share at least one instant.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    /// Whether one interval ends exactly where the other starts.
    pub fn abuts(&self, other: &Self) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// Returns the overlapping sub-interval between `self` and `other`.
    ///
    /// If one interval ends exactly when the other starts, the intersection
    /// is empty and `None` is returned.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then(|| Self::ordered(start, end))
    }

    /// The interval strictly between two disjoint intervals, if any.
    pub fn gap(&self, other: &Self) -> Option<Self> {
        if self.end < other.start {
            Some(Self::ordered(self.end, other.start))
        } else if other.end < self.start {
            Some(Self::ordered(other.end, self.start))
        } else {
            None
        }
    }

    /// Smallest interval covering both.
    pub fn span(&self, other: &Self) -> Self {
        Self::ordered(self.start.min(other.start), self.end.max(other.end))
    }
}

impl<T: TimeInstant> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}

impl Interval<Instant> {
    /// Returns the length of the interval in days as a `qtty` quantity.
    pub fn duration_days(&self) -> Days {
        self.duration().as_days()
    }
}

/// Civil date-times form their own local time line.
impl TimeInstant for CivilDateTime {
    type Duration = Duration;

    fn difference(&self, other: &Self) -> Self::Duration {
        // The civil range spans well under i64::MAX seconds.
        Duration::from_total_nanos(self.local_nanos() - other.local_nanos())
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(feature = "serde")]
impl<T: TimeInstant + Serialize> Serialize for Interval<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Interval", 2)?;
        s.serialize_field("start", &self.start)?;
        s.serialize_field("end", &self.end)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T: TimeInstant + Deserialize<'de>> Deserialize<'de> for Interval<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw<T> {
            start: T,
            end: T,
        }

        let raw = Raw::<T>::deserialize(deserializer)?;
        Interval::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

/// Returns the gaps (complement) of `intervals` within the bounding `outer` interval.
///
/// Given a sorted, non-overlapping list of sub-intervals and a bounding
/// interval, this returns the spans NOT covered by any sub-interval, in a
/// single O(n) pass.
pub fn complement_within<T: TimeInstant>(
    outer: Interval<T>,
    intervals: &[Interval<T>],
) -> Vec<Interval<T>> {
    let mut gaps = Vec::new();
    let mut cursor = outer.start;
    for p in intervals {
        if p.start > cursor {
            gaps.push(Interval::ordered(cursor, p.start.min(outer.end)));
        }
        if p.end > cursor {
            cursor = p.end;
        }
        if cursor >= outer.end {
            break;
        }
    }
    if cursor < outer.end {
        gaps.push(Interval::ordered(cursor, outer.end));
    }
    gaps.retain(|gap| !gap.is_empty());
    gaps
}

/// Returns the intersection of two sorted, non-overlapping interval lists.
///
/// O(n+m) merge; the result is in chronological order.
pub fn intersect_intervals<T: TimeInstant>(
    a: &[Interval<T>],
    b: &[Interval<T>],
) -> Vec<Interval<T>> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if let Some(overlap) = a[i].intersection(&b[j]) {
            result.push(overlap);
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}
