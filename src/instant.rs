// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zone-independent point on the time axis.
//!
//! [`Instant`] stores whole seconds since the Unix epoch plus a nanosecond
//! adjustment in `0..1_000_000_000`.  It carries no calendar, offset or zone:
//! two instants compare by their position on the time line only.  Calendar
//! fields only appear once an instant is viewed through an offset
//! ([`CivilDateTime::to_instant`](crate::CivilDateTime::to_instant)) or a
//! zone ([`ZonedDateTime::of_instant`](crate::ZonedDateTime::of_instant)).
//!
//! The supported range is `-262000-01-01T00:00:00Z` through
//! `+262000-12-31T23:59:59.999999999Z`, which keeps every instant viewable in
//! any zone without leaving the civil calendar's range.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::duration::{Duration, Unit, NANOS_PER_SECOND};
use crate::error::{TimeError, TimeResult};
use crate::fmt::Cursor;
use crate::{CivilDateTime, ZoneId, ZonedDateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════════════════════
// Instant
// ═══════════════════════════════════════════════════════════════════════════

/// A point on the time line, independent of offsets and zones.
///
/// The derived ordering is the chronological one: `(seconds, nanos)` with the
/// nanosecond part always non-negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    seconds: i64,
    nanos: u32,
}

impl Instant {
    /// `1970-01-01T00:00:00Z`.
    pub const EPOCH: Self = Self {
        seconds: 0,
        nanos: 0,
    };

    /// `-262000-01-01T00:00:00Z`, the earliest supported instant.
    pub const MIN: Self = Self {
        seconds: -8_330_088_643_200,
        nanos: 0,
    };

    /// `+262000-12-31T23:59:59.999999999Z`, the latest supported instant.
    pub const MAX: Self = Self {
        seconds: 8_205_785_827_199,
        nanos: 999_999_999,
    };

    // ── constructors ──────────────────────────────────────────────────

    /// The current instant according to the system clock.
    pub fn now() -> Self {
        let now = Utc::now();
        Self::saturating(now.timestamp(), now.timestamp_subsec_nanos())
    }

    /// Create from seconds since the epoch plus a nanosecond adjustment.
    ///
    /// The adjustment may be negative or exceed one second; it is normalized.
    pub fn from_epoch_second(seconds: i64, nano_adjustment: i64) -> TimeResult<Self> {
        let total = i128::from(seconds) * i128::from(NANOS_PER_SECOND) + i128::from(nano_adjustment);
        Self::from_total_nanos(total)
    }

    /// Create from milliseconds since the epoch.
    pub fn from_epoch_milli(millis: i64) -> TimeResult<Self> {
        let seconds = millis.div_euclid(1_000);
        let nanos = millis.rem_euclid(1_000) * 1_000_000;
        Self::checked(seconds, nanos as u32)
    }

    /// Build an instant from a `chrono::DateTime<Utc>`.
    ///
    /// A leap second is folded into the following second.
    pub fn from_utc(datetime: DateTime<Utc>) -> TimeResult<Self> {
        Self::from_epoch_second(
            datetime.timestamp(),
            i64::from(datetime.timestamp_subsec_nanos()),
        )
    }

    /// Parse ISO-8601 text carrying an offset, e.g. `2020-10-09T22:11:33Z`.
    ///
    /// Any offset is accepted; the result is the instant it denotes.
    pub fn parse(text: &str) -> TimeResult<Self> {
        let mut cursor = Cursor::new(text);
        let civil = cursor.datetime()?;
        let offset = cursor
            .offset()?
            .ok_or_else(|| cursor.error("missing UTC offset"))?;
        cursor.finish()?;
        civil.to_instant(offset)
    }

    fn checked(seconds: i64, nanos: u32) -> TimeResult<Self> {
        let instant = Self { seconds, nanos };
        if instant < Self::MIN || instant > Self::MAX {
            return Err(TimeError::RangeError("instant outside supported range"));
        }
        Ok(instant)
    }

    /// Clamp into the supported range instead of failing.
    pub(crate) fn saturating(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }.clamp(Self::MIN, Self::MAX)
    }

    pub(crate) fn saturating_nanos(total: i128) -> Self {
        let total = total.clamp(Self::MIN.total_nanos(), Self::MAX.total_nanos());
        Self {
            seconds: total.div_euclid(i128::from(NANOS_PER_SECOND)) as i64,
            nanos: total.rem_euclid(i128::from(NANOS_PER_SECOND)) as u32,
        }
    }

    pub(crate) fn from_total_nanos(total: i128) -> TimeResult<Self> {
        let seconds = total.div_euclid(i128::from(NANOS_PER_SECOND));
        let nanos = total.rem_euclid(i128::from(NANOS_PER_SECOND)) as u32;
        let seconds = i64::try_from(seconds)
            .map_err(|_| TimeError::RangeError("instant outside supported range"))?;
        Self::checked(seconds, nanos)
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// Whole seconds since the epoch (floor for pre-epoch instants).
    #[inline]
    pub const fn epoch_second(&self) -> i64 {
        self.seconds
    }

    /// Nanoseconds within the second, always in `0..1_000_000_000`.
    #[inline]
    pub const fn nano(&self) -> u32 {
        self.nanos
    }

    /// Milliseconds since the epoch; sub-millisecond digits are floored.
    pub fn to_epoch_milli(&self) -> i64 {
        // Cannot overflow: |MIN.seconds| * 1000 is far below i64::MAX.
        self.seconds * 1_000 + i64::from(self.nanos / 1_000_000)
    }

    /// Convert to a `chrono::DateTime<Utc>`.
    pub fn to_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.seconds, self.nanos)
            .expect("instant within chrono::DateTime<Utc> representable range")
    }

    pub(crate) fn to_naive_utc(self) -> NaiveDateTime {
        self.to_utc().naive_utc()
    }

    pub(crate) fn total_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Add `amount` of an exact `unit`.
    pub fn plus(&self, amount: i64, unit: Unit) -> TimeResult<Self> {
        Self::from_total_nanos(self.total_nanos() + i128::from(amount) * unit.nanos())
    }

    /// Subtract `amount` of an exact `unit`.
    pub fn minus(&self, amount: i64, unit: Unit) -> TimeResult<Self> {
        Self::from_total_nanos(self.total_nanos() - i128::from(amount) * unit.nanos())
    }

    /// Advance by an exact duration.
    pub fn plus_duration(&self, duration: Duration) -> TimeResult<Self> {
        Self::from_total_nanos(self.total_nanos() + duration.total_nanos())
    }

    /// Go back by an exact duration.
    pub fn minus_duration(&self, duration: Duration) -> TimeResult<Self> {
        Self::from_total_nanos(self.total_nanos() - duration.total_nanos())
    }

    /// Same whole second with the nanosecond part replaced.
    ///
    /// Fails with [`TimeError::RangeError`] unless `nano < 1_000_000_000`.
    pub fn with_nano(&self, nano: u32) -> TimeResult<Self> {
        if nano >= NANOS_PER_SECOND as u32 {
            return Err(TimeError::RangeError("nanosecond of second out of range"));
        }
        Self::checked(self.seconds, nano)
    }

    /// Same whole second with the fraction set to `milli` milliseconds.
    pub fn with_milli_of_second(&self, milli: u32) -> TimeResult<Self> {
        if milli >= 1_000 {
            return Err(TimeError::RangeError("millisecond of second out of range"));
        }
        self.with_nano(milli * 1_000_000)
    }

    /// Zero every field finer than `unit`.
    ///
    /// Truncation floors towards the past, so `-0.5 s` truncated to seconds
    /// is `-1 s`.  Days are UTC days.
    pub fn truncated_to(&self, unit: Unit) -> Self {
        let total = self.total_nanos();
        let truncated = total - total.rem_euclid(unit.nanos());
        // Flooring can only move below MIN if MIN itself is unaligned; it is
        // aligned to whole days.
        Self::from_total_nanos(truncated).unwrap_or(Self::MIN)
    }

    /// Exact time elapsed from `self` to `other` (negative if `other` is earlier).
    pub fn duration_until(&self, other: &Self) -> Duration {
        Duration::between(*self, *other)
    }

    /// View this instant in `zone`.
    pub fn at_zone(&self, zone: ZoneId) -> ZonedDateTime {
        ZonedDateTime::of_instant(*self, zone)
    }

    #[inline]
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }

    #[inline]
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Generic trait implementations
// ═══════════════════════════════════════════════════════════════════════════

// ── Display / FromStr ─────────────────────────────────────────────────────

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let civil = CivilDateTime::from_naive(self.to_naive_utc());
        write!(f, "{civil}Z")
    }
}

impl FromStr for Instant {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Sub for Instant {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Duration::between(rhs, self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// Trait for types that represent a position on some time line.
///
/// Types implementing this trait can be used as bounds of an
/// [`Interval`](crate::Interval).
pub trait TimeInstant: Copy + Ord + fmt::Debug + fmt::Display {
    /// The amount type produced by subtracting two positions.
    type Duration;

    /// Compute `self - other`.
    fn difference(&self, other: &Self) -> Self::Duration;
}

impl TimeInstant for Instant {
    type Duration = Duration;

    #[inline]
    fn difference(&self, other: &Self) -> Self::Duration {
        *self - *other
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_milli_roundtrip() {
        for ms in [0, 1, -1, 999, -999, 1_608_317_121_239, -62_135_596_800_001] {
            let instant = Instant::from_epoch_milli(ms).unwrap();
            assert_eq!(instant.to_epoch_milli(), ms);
        }
    }

    #[test]
    fn test_epoch_milli_negative_is_floored() {
        let instant = Instant::from_epoch_milli(-1).unwrap();
        assert_eq!(instant.epoch_second(), -1);
        assert_eq!(instant.nano(), 999_000_000);
    }

    #[test]
    fn test_epoch_milli_out_of_range() {
        assert_eq!(
            Instant::from_epoch_milli(i64::MAX),
            Err(TimeError::RangeError("instant outside supported range"))
        );
    }

    #[test]
    fn test_from_epoch_second_normalizes() {
        let instant = Instant::from_epoch_second(10, -1).unwrap();
        assert_eq!(instant.epoch_second(), 9);
        assert_eq!(instant.nano(), 999_999_999);

        let instant = Instant::from_epoch_second(10, 2_500_000_000).unwrap();
        assert_eq!(instant.epoch_second(), 12);
        assert_eq!(instant.nano(), 500_000_000);
    }

    #[test]
    fn test_min_max_display() {
        assert_eq!(Instant::MIN.to_string(), "-262000-01-01T00:00:00Z");
        assert_eq!(
            Instant::MAX.to_string(),
            "+262000-12-31T23:59:59.999999999Z"
        );
    }

    #[test]
    fn test_plus_overflow_is_range_error() {
        assert!(Instant::MAX.plus(1, Unit::Nanos).is_err());
        assert!(Instant::MIN.minus(1, Unit::Nanos).is_err());
        assert!(Instant::EPOCH.plus(i64::MAX, Unit::Days).is_err());
    }

    #[test]
    fn test_plus_and_minus_units() {
        let base = Instant::parse("2020-12-18T15:32:11.345Z").unwrap();
        assert_eq!(
            base.plus(10, Unit::Seconds).unwrap().to_string(),
            "2020-12-18T15:32:21.345Z"
        );
        assert_eq!(
            base.minus(300, Unit::Nanos).unwrap().to_string(),
            "2020-12-18T15:32:11.344999700Z"
        );
        assert_eq!(
            base.plus(2, Unit::Days).unwrap().to_string(),
            "2020-12-20T15:32:11.345Z"
        );
    }

    #[test]
    fn test_with_nano_replaces_fraction() {
        let base = Instant::parse("2020-12-18T15:32:11.345Z").unwrap();
        assert_eq!(
            base.with_milli_of_second(333).unwrap().to_string(),
            "2020-12-18T15:32:11.333Z"
        );
        assert_eq!(base.with_nano(0).unwrap().to_string(), "2020-12-18T15:32:11Z");
        assert!(base.with_nano(1_000_000_000).is_err());
        assert!(base.with_milli_of_second(1_000).is_err());

        let before_epoch = Instant::from_epoch_milli(-1).unwrap();
        assert_eq!(before_epoch.with_nano(0).unwrap().epoch_second(), -1);
        assert!(Instant::MAX.with_nano(0).unwrap() < Instant::MAX);
    }

    #[test]
    fn test_truncated_to() {
        let base = Instant::parse("2020-12-18T15:32:11.345678Z").unwrap();
        assert_eq!(
            base.truncated_to(Unit::Seconds).to_string(),
            "2020-12-18T15:32:11Z"
        );
        assert_eq!(
            base.truncated_to(Unit::Hours).to_string(),
            "2020-12-18T15:00:00Z"
        );
        assert_eq!(
            base.truncated_to(Unit::Days).to_string(),
            "2020-12-18T00:00:00Z"
        );
    }

    #[test]
    fn test_truncated_to_is_idempotent() {
        let base = Instant::from_epoch_second(-1, 123_456_789).unwrap();
        for unit in [Unit::Micros, Unit::Seconds, Unit::Minutes, Unit::HalfDays] {
            let once = base.truncated_to(unit);
            assert_eq!(once.truncated_to(unit), once);
        }
    }

    #[test]
    fn test_truncated_pre_epoch_floors() {
        let instant = Instant::from_epoch_second(-1, 500_000_000).unwrap();
        assert_eq!(instant.truncated_to(Unit::Seconds).epoch_second(), -1);
        assert_eq!(instant.truncated_to(Unit::Minutes).epoch_second(), -60);
    }

    #[test]
    fn test_parse_with_offset() {
        let instant = Instant::parse("2020-10-10T00:11:33+02:00").unwrap();
        assert_eq!(instant.to_string(), "2020-10-09T22:11:33Z");
    }

    #[test]
    fn test_parse_requires_offset() {
        assert!(matches!(
            Instant::parse("2020-10-09T22:11:33"),
            Err(TimeError::InvalidFormat { .. })
        ));
        assert!(Instant::parse("2020-10-09T22:11:33Z[UTC]").is_err());
    }

    #[test]
    fn test_format_stability() {
        for text in [
            "2020-10-09T22:11:33Z",
            "1969-07-20T20:17:40.100Z",
            "2020-12-18T15:32:11.123456Z",
            "0001-01-01T00:00:00.000000001Z",
            "-0044-03-15T12:00:00Z",
        ] {
            let instant: Instant = text.parse().unwrap();
            assert_eq!(instant.to_string(), text);
        }
    }

    #[test]
    fn test_sub_yields_duration() {
        let a = Instant::from_epoch_second(100, 0).unwrap();
        let b = Instant::from_epoch_second(40, 500_000_000).unwrap();
        let d = a - b;
        assert_eq!(d.seconds(), 59);
        assert_eq!(d.subsec_nanos(), 500_000_000);
        assert!((b - a).is_negative());
    }

    #[test]
    fn test_ordering_and_timeinstant() {
        let a = Instant::from_epoch_milli(1_000).unwrap();
        let b = Instant::from_epoch_milli(2_000).unwrap();
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));
        assert_eq!(b.difference(&a), Duration::of_seconds(1));
    }

    #[test]
    fn test_utc_roundtrip() {
        let datetime = DateTime::from_timestamp(946_728_000, 123).unwrap();
        let instant = Instant::from_utc(datetime).unwrap();
        assert_eq!(instant.to_utc(), datetime);
    }
}
