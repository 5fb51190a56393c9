// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil (wall-clock) values with no zone or offset.
//!
//! [`CivilDate`], [`CivilTime`] and [`CivilDateTime`] wrap the proleptic
//! Gregorian `chrono` naive types.  None of them identifies a point on the
//! time line: that needs an explicit [`UtcOffset`] or a [`ZoneId`].
//!
//! Duration arithmetic on civil values is plain wall-clock advancement; it
//! never consults a zone, so a civil value may land on a time that some zone
//! skips.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::duration::{Duration, Unit, NANOS_PER_SECOND, SECONDS_PER_DAY};
use crate::error::{TimeError, TimeResult};
use crate::fmt::{write_fraction, write_year, Cursor};
use crate::{Instant, Period, UtcOffset, ZoneId, ZonedDateTime};

/// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAY_CE: i64 = 719_163;

// ═══════════════════════════════════════════════════════════════════════════
// CivilDate
// ═══════════════════════════════════════════════════════════════════════════

/// A calendar date without a time of day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate(NaiveDate);

impl CivilDate {
    /// Fails with [`TimeError::InvalidDate`] for fields like April 31.
    pub fn of(year: i32, month: u32, day: u32) -> TimeResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| TimeError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Days since 1970-01-01.
    pub fn from_epoch_day(day: i64) -> TimeResult<Self> {
        day.checked_add(UNIX_EPOCH_DAY_CE)
            .and_then(|ce| i32::try_from(ce).ok())
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(Self)
            .ok_or(TimeError::RangeError("date outside supported range"))
    }

    pub(crate) const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub(crate) const fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// 1-based ordinal day within the year.
    pub fn day_of_year(&self) -> u32 {
        self.0.ordinal()
    }

    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    pub fn length_of_month(&self) -> u32 {
        match self.month() {
            2 if self.is_leap_year() => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Days since 1970-01-01.
    pub fn epoch_day(&self) -> i64 {
        i64::from(self.0.num_days_from_ce()) - UNIX_EPOCH_DAY_CE
    }

    /// Same month and day in `year`; fails for February 29 outside leap
    /// years.
    pub fn with_year(&self, year: i32) -> TimeResult<Self> {
        adjust(self.0.with_year(year), "year", year, self).map(Self)
    }

    pub fn with_month(&self, month: u32) -> TimeResult<Self> {
        adjust(self.0.with_month(month), "month", month, self).map(Self)
    }

    /// Fails with [`TimeError::InvalidDate`] when the month has no such day.
    pub fn with_day(&self, day: u32) -> TimeResult<Self> {
        adjust(self.0.with_day(day), "day", day, self).map(Self)
    }

    pub fn plus_days(&self, days: i64) -> TimeResult<Self> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Self)
            .ok_or(TimeError::RangeError("date outside supported range"))
    }

    /// Calendar months; the day is clamped to the target month's length.
    pub fn plus_months(&self, months: i64) -> TimeResult<Self> {
        let count = u32::try_from(months.unsigned_abs())
            .map_err(|_| TimeError::RangeError("month count overflow"))?;
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(count))
        } else {
            self.0.checked_sub_months(Months::new(count))
        };
        shifted
            .map(Self)
            .ok_or(TimeError::RangeError("date outside supported range"))
    }

    pub fn plus_period(&self, period: &Period) -> TimeResult<Self> {
        self.plus_months(period.to_total_months())?
            .plus_days(i64::from(period.days()))
    }

    pub fn minus_period(&self, period: &Period) -> TimeResult<Self> {
        self.plus_period(&period.negated()?)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &Self) -> i64 {
        other.epoch_day() - self.epoch_day()
    }

    pub fn at(&self, time: CivilTime) -> CivilDateTime {
        CivilDateTime(self.0.and_time(time.0))
    }

    pub fn at_start_of_day(&self) -> CivilDateTime {
        self.at(CivilTime::midnight())
    }
}

fn adjust<T>(
    adjusted: Option<T>,
    field: &str,
    value: impl fmt::Display,
    original: &impl fmt::Display,
) -> TimeResult<T> {
    adjusted.ok_or_else(|| TimeError::InvalidDate(format!("{field} {value} in {original}")))
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_year(f, self.year())?;
        write!(f, "-{:02}-{:02}", self.month(), self.day())
    }
}

impl FromStr for CivilDate {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        let date = cursor.date()?;
        cursor.finish()?;
        Ok(date)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CivilTime
// ═══════════════════════════════════════════════════════════════════════════

/// A wall-clock time of day with nanosecond precision.  Leap seconds are not
/// representable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilTime(NaiveTime);

impl CivilTime {
    pub fn of(hour: u32, minute: u32, second: u32, nanosecond: u32) -> TimeResult<Self> {
        if nanosecond >= NANOS_PER_SECOND as u32 {
            return Err(TimeError::InvalidDate(format!(
                "{hour:02}:{minute:02}:{second:02}.{nanosecond}"
            )));
        }
        NaiveTime::from_hms_nano_opt(hour, minute, second, nanosecond)
            .map(Self)
            .ok_or_else(|| TimeError::InvalidDate(format!("{hour:02}:{minute:02}:{second:02}")))
    }

    pub const fn midnight() -> Self {
        Self(NaiveTime::MIN)
    }

    /// Nanoseconds since midnight, in `0..86_400_000_000_000`.
    pub fn from_nanos_of_day(nanos: i64) -> TimeResult<Self> {
        if !(0..SECONDS_PER_DAY * NANOS_PER_SECOND).contains(&nanos) {
            return Err(TimeError::RangeError("nanosecond of day out of range"));
        }
        let seconds = (nanos / NANOS_PER_SECOND) as u32;
        let subsec = (nanos % NANOS_PER_SECOND) as u32;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, subsec)
            .map(Self)
            .ok_or(TimeError::RangeError("nanosecond of day out of range"))
    }

    pub(crate) const fn naive(&self) -> NaiveTime {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.0.nanosecond()
    }

    pub fn nanos_of_day(&self) -> i64 {
        i64::from(self.0.num_seconds_from_midnight()) * NANOS_PER_SECOND
            + i64::from(self.nanosecond())
    }
}

impl fmt::Display for CivilTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )?;
        write_fraction(f, self.nanosecond())
    }
}

impl FromStr for CivilTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        let time = cursor.time()?;
        cursor.finish()?;
        Ok(time)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CivilDateTime
// ═══════════════════════════════════════════════════════════════════════════

/// A calendar date and wall-clock time without a zone or offset.
///
/// Ordered lexicographically by its fields.  There is deliberately no
/// comparison against [`Instant`] or [`ZonedDateTime`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime(NaiveDateTime);

impl CivilDateTime {
    /// Fails with [`TimeError::InvalidDate`] on any out-of-range field.
    pub fn of(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
    ) -> TimeResult<Self> {
        Ok(CivilDate::of(year, month, day)?.at(CivilTime::of(hour, minute, second, nanosecond)?))
    }

    pub fn from_parts(date: CivilDate, time: CivilTime) -> Self {
        date.at(time)
    }

    pub(crate) const fn from_naive(naive: NaiveDateTime) -> Self {
        Self(naive)
    }

    pub(crate) const fn naive(&self) -> NaiveDateTime {
        self.0
    }

    // ── fields ────────────────────────────────────────────────────────

    pub fn date(&self) -> CivilDate {
        CivilDate(self.0.date())
    }

    pub fn time(&self) -> CivilTime {
        CivilTime(self.0.time())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.0.nanosecond()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn day_of_year(&self) -> u32 {
        self.0.ordinal()
    }

    // ── field adjusters ───────────────────────────────────────────────
    //
    // Each returns a copy with one field replaced and fails with
    // `InvalidDate` instead of clamping or rolling over.

    pub fn with_year(&self, year: i32) -> TimeResult<Self> {
        adjust(self.0.with_year(year), "year", year, self).map(Self)
    }

    pub fn with_month(&self, month: u32) -> TimeResult<Self> {
        adjust(self.0.with_month(month), "month", month, self).map(Self)
    }

    pub fn with_day(&self, day: u32) -> TimeResult<Self> {
        adjust(self.0.with_day(day), "day", day, self).map(Self)
    }

    pub fn with_hour(&self, hour: u32) -> TimeResult<Self> {
        adjust(self.0.with_hour(hour), "hour", hour, self).map(Self)
    }

    pub fn with_minute(&self, minute: u32) -> TimeResult<Self> {
        adjust(self.0.with_minute(minute), "minute", minute, self).map(Self)
    }

    pub fn with_second(&self, second: u32) -> TimeResult<Self> {
        adjust(self.0.with_second(second), "second", second, self).map(Self)
    }

    /// Nanosecond of the second, in `0..1_000_000_000`.
    pub fn with_nanosecond(&self, nanosecond: u32) -> TimeResult<Self> {
        let adjusted = (nanosecond < NANOS_PER_SECOND as u32)
            .then(|| self.0.with_nanosecond(nanosecond))
            .flatten();
        adjust(adjusted, "nanosecond", nanosecond, self).map(Self)
    }

    // ── local time line ───────────────────────────────────────────────

    /// The wall-clock reading as nanoseconds since `1970-01-01T00:00`, as if
    /// it were UTC.
    pub(crate) fn local_nanos(&self) -> i128 {
        i128::from(self.0.and_utc().timestamp()) * i128::from(NANOS_PER_SECOND)
            + i128::from(self.nanosecond())
    }

    pub(crate) fn from_local_nanos(total: i128) -> TimeResult<Self> {
        let seconds = i64::try_from(total.div_euclid(i128::from(NANOS_PER_SECOND)))
            .map_err(|_| TimeError::RangeError("date-time outside supported range"))?;
        let nanos = total.rem_euclid(i128::from(NANOS_PER_SECOND)) as u32;
        chrono::DateTime::from_timestamp(seconds, nanos)
            .map(|utc| Self(utc.naive_utc()))
            .ok_or(TimeError::RangeError("date-time outside supported range"))
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Calendar arithmetic on the date; the time of day is unchanged.
    pub fn plus_period(&self, period: &Period) -> TimeResult<Self> {
        Ok(self.date().plus_period(period)?.at(self.time()))
    }

    pub fn minus_period(&self, period: &Period) -> TimeResult<Self> {
        Ok(self.date().minus_period(period)?.at(self.time()))
    }

    /// Wall-clock advancement: 24 hours is always the same time tomorrow.
    pub fn plus_duration(&self, duration: Duration) -> TimeResult<Self> {
        Self::from_local_nanos(self.local_nanos() + duration.total_nanos())
    }

    pub fn minus_duration(&self, duration: Duration) -> TimeResult<Self> {
        Self::from_local_nanos(self.local_nanos() - duration.total_nanos())
    }

    pub fn plus(&self, amount: i64, unit: Unit) -> TimeResult<Self> {
        Self::from_local_nanos(self.local_nanos() + i128::from(amount) * unit.nanos())
    }

    pub fn minus(&self, amount: i64, unit: Unit) -> TimeResult<Self> {
        Self::from_local_nanos(self.local_nanos() - i128::from(amount) * unit.nanos())
    }

    /// Zero every field finer than `unit`.
    pub fn truncated_to(&self, unit: Unit) -> Self {
        let total = self.local_nanos();
        // Every unit divides a day, so flooring never leaves the day.
        Self::from_local_nanos(total - total.rem_euclid(unit.nanos())).unwrap_or(*self)
    }

    // ── conversions ───────────────────────────────────────────────────

    /// The instant this wall-clock reading denotes at `offset`.
    pub fn to_instant(&self, offset: UtcOffset) -> TimeResult<Instant> {
        Instant::from_total_nanos(
            self.local_nanos() - i128::from(offset.seconds()) * i128::from(NANOS_PER_SECOND),
        )
    }

    /// Resolve in `zone` with the default gap and overlap policy.
    pub fn at_zone(&self, zone: ZoneId) -> ZonedDateTime {
        ZonedDateTime::of(*self, zone)
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date(), self.time())
    }
}

impl FromStr for CivilDateTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        let civil = cursor.datetime()?;
        cursor.finish()?;
        Ok(civil)
    }
}

crate::serde_as_string!(CivilDate, CivilTime, CivilDateTime);
