// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Exact amounts of elapsed time.
//!
//! A [`Duration`] is a signed `(seconds, nanoseconds)` pair.  It knows
//! nothing about calendars: one day is always 86 400 seconds, whatever the
//! zone does on that day.  Calendar-relative amounts live in
//! [`Period`](crate::Period).

use qtty::{Days, Seconds};
use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::error::{TimeError, TimeResult};
use crate::Instant;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

// ═══════════════════════════════════════════════════════════════════════════
// Unit
// ═══════════════════════════════════════════════════════════════════════════

/// Exact time units.
///
/// Months and years have no fixed length and are deliberately absent; use a
/// [`Period`](crate::Period) on a civil or zoned value for those.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
    /// Twelve hours.
    HalfDays,
    /// Exactly 86 400 seconds.
    Days,
}

impl Unit {
    /// Length of one unit in nanoseconds.
    pub const fn nanos(self) -> i128 {
        match self {
            Unit::Nanos => 1,
            Unit::Micros => 1_000,
            Unit::Millis => 1_000_000,
            Unit::Seconds => 1_000_000_000,
            Unit::Minutes => 60_000_000_000,
            Unit::Hours => 3_600_000_000_000,
            Unit::HalfDays => 43_200_000_000_000,
            Unit::Days => 86_400_000_000_000,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════════════════════════════════════

/// An exact, signed amount of time.
///
/// Stored as whole seconds plus a non-negative nanosecond adjustment, so
/// `-0.5 s` is `(-1, 500_000_000)`.  The derived ordering is the numeric one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    seconds: i64,
    nanos: u32,
}

impl Duration {
    pub const ZERO: Self = Self {
        seconds: 0,
        nanos: 0,
    };

    // ── constructors ──────────────────────────────────────────────────

    /// Standard 24-hour days.
    pub const fn of_days(days: i32) -> Self {
        Self::of_seconds(days as i64 * SECONDS_PER_DAY)
    }

    pub const fn of_hours(hours: i32) -> Self {
        Self::of_seconds(hours as i64 * 3_600)
    }

    pub const fn of_minutes(minutes: i32) -> Self {
        Self::of_seconds(minutes as i64 * 60)
    }

    pub const fn of_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    pub const fn of_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1_000),
            nanos: (millis.rem_euclid(1_000) * 1_000_000) as u32,
        }
    }

    pub const fn of_nanos(nanos: i64) -> Self {
        Self {
            seconds: nanos.div_euclid(NANOS_PER_SECOND),
            nanos: nanos.rem_euclid(NANOS_PER_SECOND) as u32,
        }
    }

    /// Seconds plus a nanosecond adjustment of any sign and size.
    pub fn of_seconds_and_nanos(seconds: i64, nano_adjustment: i64) -> TimeResult<Self> {
        Self::from_total_nanos(
            i128::from(seconds) * i128::from(NANOS_PER_SECOND) + i128::from(nano_adjustment),
        )
    }

    /// `amount` of an exact unit.
    pub fn of(amount: i64, unit: Unit) -> TimeResult<Self> {
        Self::from_total_nanos(i128::from(amount) * unit.nanos())
    }

    /// Exact time from `start` to `end`.
    pub fn between(start: Instant, end: Instant) -> Self {
        // Both instants lie in the supported range, so the difference always
        // fits in i64 seconds.
        Self::from_total_nanos(end.total_nanos() - start.total_nanos()).unwrap_or(Self::ZERO)
    }

    pub(crate) fn from_total_nanos(total: i128) -> TimeResult<Self> {
        let seconds = i64::try_from(total.div_euclid(i128::from(NANOS_PER_SECOND)))
            .map_err(|_| TimeError::RangeError("duration overflow"))?;
        let nanos = total.rem_euclid(i128::from(NANOS_PER_SECOND)) as u32;
        Ok(Self { seconds, nanos })
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// Whole seconds, floored.
    #[inline]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond adjustment in `0..1_000_000_000`.
    #[inline]
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    pub const fn is_zero(&self) -> bool {
        self.seconds == 0 && self.nanos == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.seconds < 0
    }

    pub(crate) fn total_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }

    /// Whole milliseconds, truncated towards zero.
    pub fn to_millis(&self) -> TimeResult<i64> {
        i64::try_from(self.total_nanos() / 1_000_000)
            .map_err(|_| TimeError::RangeError("duration overflow"))
    }

    /// Whole 24-hour days, truncated towards zero.
    pub fn to_days(&self) -> i64 {
        (self.total_nanos() / Unit::Days.nanos()) as i64
    }

    /// Length as a `qtty` seconds quantity.
    pub fn as_seconds(&self) -> Seconds {
        Seconds::new(self.seconds as f64 + f64::from(self.nanos) / 1e9)
    }

    /// Length as a `qtty` days quantity.
    pub fn as_days(&self) -> Days {
        self.as_seconds().to::<qtty::Day>()
    }

    /// Nearest duration to a `qtty` seconds quantity, at nanosecond resolution.
    pub fn from_quantity(seconds: Seconds) -> TimeResult<Self> {
        let value = seconds.value();
        if !value.is_finite() {
            return Err(TimeError::RangeError("non-finite duration"));
        }
        let nanos = (value * 1e9).round();
        if nanos.abs() >= 1.7e38 {
            return Err(TimeError::RangeError("duration overflow"));
        }
        Self::from_total_nanos(nanos as i128)
    }

    // ── algebra ───────────────────────────────────────────────────────

    pub fn plus(&self, other: Self) -> TimeResult<Self> {
        Self::from_total_nanos(self.total_nanos() + other.total_nanos())
    }

    pub fn minus(&self, other: Self) -> TimeResult<Self> {
        Self::from_total_nanos(self.total_nanos() - other.total_nanos())
    }

    pub fn negated(&self) -> TimeResult<Self> {
        Self::from_total_nanos(-self.total_nanos())
    }

    pub fn abs(&self) -> TimeResult<Self> {
        if self.is_negative() {
            self.negated()
        } else {
            Ok(*self)
        }
    }

    pub fn multiplied_by(&self, factor: i64) -> TimeResult<Self> {
        self.total_nanos()
            .checked_mul(i128::from(factor))
            .ok_or(TimeError::RangeError("duration overflow"))
            .and_then(Self::from_total_nanos)
    }
}

// ── Display ───────────────────────────────────────────────────────────────

/// ISO-8601 duration notation with hours as the largest unit: `PT25H30M`,
/// `PT-0.5S`, `PT0S`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        // Hours and minutes are truncated towards zero, so a negative value
        // with a fraction borrows one second back.
        let mut total_secs = self.seconds;
        if total_secs < 0 && self.nanos > 0 {
            total_secs += 1;
        }
        let hours = total_secs / 3_600;
        let minutes = (total_secs % 3_600) / 60;
        let secs = total_secs % 60;

        f.write_str("PT")?;
        if hours != 0 {
            write!(f, "{hours}H")?;
        }
        if minutes != 0 {
            write!(f, "{minutes}M")?;
        }
        if secs == 0 && self.nanos == 0 {
            return Ok(());
        }
        if self.seconds < 0 && self.nanos > 0 && secs == 0 {
            f.write_str("-0")?;
        } else {
            write!(f, "{secs}")?;
        }
        if self.nanos > 0 {
            let fraction = if self.seconds < 0 {
                NANOS_PER_SECOND as u32 - self.nanos
            } else {
                self.nanos
            };
            let digits = format!("{fraction:09}");
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        f.write_str("S")
    }
}

// ── Operators ─────────────────────────────────────────────────────────────
//
// Like `std::time::Duration`, the operators panic on overflow; use the
// checked methods when the operands are untrusted.

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.plus(rhs).expect("overflow when adding durations")
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.minus(rhs).expect("overflow when subtracting durations")
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated().expect("overflow when negating duration")
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Duration", 2)?;
        s.serialize_field("seconds", &self.seconds)?;
        s.serialize_field("nanos", &self.nanos)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            seconds: i64,
            nanos: u32,
        }

        let raw = Raw::deserialize(deserializer)?;
        Duration::of_seconds_and_nanos(raw.seconds, i64::from(raw.nanos))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_agree() {
        assert_eq!(Duration::of_days(1), Duration::of_hours(24));
        assert_eq!(Duration::of_hours(1), Duration::of_minutes(60));
        assert_eq!(Duration::of_minutes(1), Duration::of_seconds(60));
        assert_eq!(Duration::of_seconds(1), Duration::of_millis(1_000));
        assert_eq!(Duration::of_millis(1), Duration::of_nanos(1_000_000));
        assert_eq!(Duration::of(3, Unit::HalfDays).unwrap(), Duration::of_hours(36));
    }

    #[test]
    fn test_negative_normalization() {
        let d = Duration::of_millis(-500);
        assert_eq!(d.seconds(), -1);
        assert_eq!(d.subsec_nanos(), 500_000_000);
        assert!(d.is_negative());
        assert_eq!(d.to_millis().unwrap(), -500);
    }

    #[test]
    fn test_algebra() {
        let ninety = Duration::of_hours(1).plus(Duration::of_minutes(30)).unwrap();
        assert_eq!(ninety, Duration::of_minutes(90));
        assert_eq!(ninety.minus(Duration::of_hours(2)).unwrap(), Duration::of_minutes(-30));
        assert_eq!(ninety.negated().unwrap(), Duration::of_minutes(-90));
        assert_eq!(Duration::of_minutes(-90).abs().unwrap(), ninety);
        assert_eq!(ninety.multiplied_by(2).unwrap(), Duration::of_hours(3));
        assert_eq!(ninety + ninety - ninety, ninety);
        assert_eq!(-ninety, Duration::of_minutes(-90));
    }

    #[test]
    fn test_overflow_is_range_error() {
        let max = Duration::of_seconds(i64::MAX);
        assert_eq!(
            max.plus(Duration::of_seconds(1)),
            Err(TimeError::RangeError("duration overflow"))
        );
        assert!(Duration::of_seconds(i64::MIN).negated().is_err());
        assert!(max.multiplied_by(2).is_err());
    }

    #[test]
    fn test_total_order() {
        let mut values = vec![
            Duration::of_seconds(1),
            Duration::of_millis(-1),
            Duration::ZERO,
            Duration::of_nanos(1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Duration::of_millis(-1),
                Duration::ZERO,
                Duration::of_nanos(1),
                Duration::of_seconds(1)
            ]
        );
    }

    #[test]
    fn test_between_instants() {
        let a = Instant::from_epoch_milli(1_000).unwrap();
        let b = Instant::from_epoch_milli(3_500).unwrap();
        assert_eq!(Duration::between(a, b), Duration::of_millis(2_500));
        assert_eq!(Duration::between(b, a), Duration::of_millis(-2_500));
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration::of_seconds(15).to_string(), "PT15S");
        assert_eq!(
            Duration::of_hours(1).plus(Duration::of_minutes(30)).unwrap().to_string(),
            "PT1H30M"
        );
        assert_eq!(Duration::of_days(1).to_string(), "PT24H");
        assert_eq!(Duration::of_millis(-500).to_string(), "PT-0.5S");
        assert_eq!(Duration::of_millis(-1_500).to_string(), "PT-1.5S");
        assert_eq!(Duration::of_minutes(-61).to_string(), "PT-1H-1M");
        assert_eq!(Duration::of_nanos(1).to_string(), "PT0.000000001S");
    }

    #[test]
    fn test_qtty_interop() {
        let d = Duration::of_hours(36);
        assert!((d.as_days() - Days::new(1.5)).abs() < Days::new(1e-12));
        assert!((d.as_seconds() - Seconds::new(129_600.0)).abs() < Seconds::new(1e-9));
        assert_eq!(Duration::from_quantity(Seconds::new(1.5)).unwrap(), Duration::of_millis(1_500));
        assert_eq!(d.to_days(), 1);
    }
}
