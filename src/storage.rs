// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Storage mapping for SQL drivers.
//!
//! The value types map onto the PostgreSQL binary wire formats, which most
//! drivers expose as plain integers:
//!
//! | Rust type         | Column        | Wire value                                   |
//! |-------------------|---------------|----------------------------------------------|
//! | [`CivilDateTime`] | `timestamp`   | `i64` microseconds since `2000-01-01T00:00`  |
//! | [`Instant`]       | `timestamptz` | `i64` microseconds since `2000-01-01T00:00Z` |
//! | [`CivilDate`]     | `date`        | `i32` days since `2000-01-01`                |
//! | [`CivilTime`]     | `time`        | `i64` microseconds since midnight            |
//!
//! The columns hold microseconds, so encoding floors away any
//! sub-microsecond digits.  A `timestamptz` column stores only the instant:
//! a [`ZonedDateTime`] is written through its instant and read back with an
//! explicitly supplied zone.
//!
//! Drivers that speak `chrono` can use the `From`/`TryFrom` conversions
//! defined here instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::duration::NANOS_PER_SECOND;
use crate::error::{TimeError, TimeResult};
use crate::{CivilDate, CivilDateTime, CivilTime, Instant, ZoneId, ZonedDateTime};

/// Seconds from the Unix epoch to `2000-01-01T00:00:00Z`.
const PG_EPOCH_SECONDS: i128 = 946_684_800;
/// Days from the Unix epoch to `2000-01-01`.
const PG_EPOCH_DAY: i64 = 10_957;
const NANOS_PER_MICRO: i128 = 1_000;

/// A PostgreSQL column type with its type OID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// `timestamp without time zone`.
    Timestamp,
    /// `timestamp with time zone`.
    TimestampTz,
    Date,
    /// `time without time zone`.
    Time,
}

impl ColumnType {
    pub const fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Timestamp => "timestamp",
            ColumnType::TimestampTz => "timestamptz",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
        }
    }

    pub const fn oid(self) -> u32 {
        match self {
            ColumnType::Timestamp => 1114,
            ColumnType::TimestampTz => 1184,
            ColumnType::Date => 1082,
            ColumnType::Time => 1083,
        }
    }

    pub const fn array_oid(self) -> u32 {
        match self {
            ColumnType::Timestamp => 1115,
            ColumnType::TimestampTz => 1185,
            ColumnType::Date => 1182,
            ColumnType::Time => 1183,
        }
    }
}

/// A value with a binary column representation.
pub trait SqlValue: Sized {
    const COLUMN: ColumnType;

    /// The integer sent over the wire.
    type Wire: Copy;

    fn to_pg_binary(&self) -> TimeResult<Self::Wire>;

    fn from_pg_binary(wire: Self::Wire) -> TimeResult<Self>;
}

fn micros_from_nanos(nanos: i128) -> TimeResult<i64> {
    i64::try_from(nanos.div_euclid(NANOS_PER_MICRO))
        .map_err(|_| TimeError::RangeError("value does not fit the column"))
}

fn pg_epoch_nanos() -> i128 {
    PG_EPOCH_SECONDS * i128::from(NANOS_PER_SECOND)
}

impl SqlValue for CivilDateTime {
    const COLUMN: ColumnType = ColumnType::Timestamp;
    type Wire = i64;

    fn to_pg_binary(&self) -> TimeResult<i64> {
        micros_from_nanos(self.local_nanos() - pg_epoch_nanos())
    }

    fn from_pg_binary(micros: i64) -> TimeResult<Self> {
        Self::from_local_nanos(pg_epoch_nanos() + i128::from(micros) * NANOS_PER_MICRO)
    }
}

impl SqlValue for Instant {
    const COLUMN: ColumnType = ColumnType::TimestampTz;
    type Wire = i64;

    fn to_pg_binary(&self) -> TimeResult<i64> {
        micros_from_nanos(self.total_nanos() - pg_epoch_nanos())
    }

    fn from_pg_binary(micros: i64) -> TimeResult<Self> {
        Self::from_total_nanos(pg_epoch_nanos() + i128::from(micros) * NANOS_PER_MICRO)
    }
}

impl SqlValue for CivilDate {
    const COLUMN: ColumnType = ColumnType::Date;
    type Wire = i32;

    fn to_pg_binary(&self) -> TimeResult<i32> {
        i32::try_from(self.epoch_day() - PG_EPOCH_DAY)
            .map_err(|_| TimeError::RangeError("value does not fit the column"))
    }

    fn from_pg_binary(days: i32) -> TimeResult<Self> {
        Self::from_epoch_day(i64::from(days) + PG_EPOCH_DAY)
    }
}

impl SqlValue for CivilTime {
    const COLUMN: ColumnType = ColumnType::Time;
    type Wire = i64;

    fn to_pg_binary(&self) -> TimeResult<i64> {
        Ok(self.nanos_of_day() / 1_000)
    }

    fn from_pg_binary(micros: i64) -> TimeResult<Self> {
        let nanos = micros
            .checked_mul(1_000)
            .ok_or(TimeError::RangeError("nanosecond of day out of range"))?;
        Self::from_nanos_of_day(nanos)
    }
}

impl ZonedDateTime {
    /// Encode for a `timestamptz` column; the zone is not stored.
    pub fn to_pg_timestamptz(&self) -> TimeResult<i64> {
        self.to_instant().to_pg_binary()
    }

    /// Decode a `timestamptz` value and view it in `zone`.
    pub fn from_pg_timestamptz(micros: i64, zone: ZoneId) -> TimeResult<Self> {
        Ok(Self::of_instant(Instant::from_pg_binary(micros)?, zone))
    }

    /// View a `chrono` UTC date-time in `zone`.
    pub fn from_utc_datetime(datetime: DateTime<Utc>, zone: ZoneId) -> TimeResult<Self> {
        Ok(Self::of_instant(Instant::from_utc(datetime)?, zone))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// chrono interop
// ═══════════════════════════════════════════════════════════════════════════

fn reject_leap_second(nanos: u32, what: &str) -> TimeResult<()> {
    if nanos >= NANOS_PER_SECOND as u32 {
        return Err(TimeError::InvalidDate(format!("leap second in {what}")));
    }
    Ok(())
}

impl From<CivilDateTime> for NaiveDateTime {
    fn from(civil: CivilDateTime) -> Self {
        civil.naive()
    }
}

impl TryFrom<NaiveDateTime> for CivilDateTime {
    type Error = TimeError;

    /// Fails for chrono's leap-second representation.
    fn try_from(naive: NaiveDateTime) -> TimeResult<Self> {
        reject_leap_second(naive.nanosecond(), &naive.to_string())?;
        Ok(CivilDateTime::from_naive(naive))
    }
}

impl From<CivilDate> for NaiveDate {
    fn from(date: CivilDate) -> Self {
        date.naive()
    }
}

impl From<NaiveDate> for CivilDate {
    fn from(date: NaiveDate) -> Self {
        CivilDate::from_naive(date)
    }
}

impl From<CivilTime> for NaiveTime {
    fn from(time: CivilTime) -> Self {
        time.naive()
    }
}

impl TryFrom<NaiveTime> for CivilTime {
    type Error = TimeError;

    fn try_from(time: NaiveTime) -> TimeResult<Self> {
        reject_leap_second(time.nanosecond(), &time.to_string())?;
        CivilTime::of(time.hour(), time.minute(), time.second(), time.nanosecond())
    }
}

impl From<Instant> for DateTime<Utc> {
    fn from(instant: Instant) -> Self {
        instant.to_utc()
    }
}

impl TryFrom<DateTime<Utc>> for Instant {
    type Error = TimeError;

    fn try_from(datetime: DateTime<Utc>) -> TimeResult<Self> {
        Instant::from_utc(datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_metadata() {
        assert_eq!(CivilDateTime::COLUMN.oid(), 1114);
        assert_eq!(Instant::COLUMN.sql_name(), "timestamptz");
        assert_eq!(CivilDate::COLUMN.oid(), 1082);
        assert_eq!(CivilTime::COLUMN.array_oid(), 1183);
    }

    #[test]
    fn test_epochs_encode_to_zero() {
        let civil: CivilDateTime = "2000-01-01T00:00".parse().unwrap();
        assert_eq!(civil.to_pg_binary().unwrap(), 0);
        let instant = Instant::parse("2000-01-01T00:00:00Z").unwrap();
        assert_eq!(instant.to_pg_binary().unwrap(), 0);
        let date: CivilDate = "2000-01-01".parse().unwrap();
        assert_eq!(date.to_pg_binary().unwrap(), 0);
        assert_eq!(CivilTime::midnight().to_pg_binary().unwrap(), 0);
    }

    #[test]
    fn test_known_values() {
        let civil: CivilDateTime = "2021-03-28T02:30".parse().unwrap();
        // 7757 days and 9000 seconds after the epoch.
        assert_eq!(civil.to_pg_binary().unwrap(), 670_213_800_000_000);
        assert_eq!(CivilDateTime::from_pg_binary(670_213_800_000_000).unwrap(), civil);

        let date: CivilDate = "1999-12-31".parse().unwrap();
        assert_eq!(date.to_pg_binary().unwrap(), -1);
        assert_eq!(CivilDate::from_pg_binary(-1).unwrap(), date);

        let time: CivilTime = "01:00:00.000001".parse().unwrap();
        assert_eq!(time.to_pg_binary().unwrap(), 3_600_000_001);
        assert_eq!(CivilTime::from_pg_binary(3_600_000_001).unwrap(), time);
    }

    #[test]
    fn test_sub_microsecond_digits_are_floored() {
        let instant = Instant::parse("1999-12-31T23:59:59.999999999Z").unwrap();
        assert_eq!(instant.to_pg_binary().unwrap(), -1);
        let civil: CivilDateTime = "2000-01-01T00:00:00.000000999".parse().unwrap();
        assert_eq!(civil.to_pg_binary().unwrap(), 0);
    }

    #[test]
    fn test_decode_out_of_range() {
        assert!(Instant::from_pg_binary(i64::MAX).is_err());
        assert!(CivilTime::from_pg_binary(86_400_000_000).is_err());
        assert!(CivilTime::from_pg_binary(-1).is_err());
    }

    #[test]
    fn test_timestamptz_needs_zone_on_read() {
        let warsaw = ZoneId::of("Europe/Warsaw").unwrap();
        let original: ZonedDateTime = "2021-10-31T02:30:00+01:00[Europe/Warsaw]".parse().unwrap();
        let micros = original.to_pg_timestamptz().unwrap();
        let back = ZonedDateTime::from_pg_timestamptz(micros, warsaw).unwrap();
        assert_eq!(back, original);
        let utc = ZonedDateTime::from_pg_timestamptz(micros, ZoneId::UTC).unwrap();
        assert_eq!(utc.to_string(), "2021-10-31T01:30:00Z");
    }

    #[test]
    fn test_chrono_interop() {
        let naive = NaiveDate::from_ymd_opt(2021, 1, 2)
            .unwrap()
            .and_hms_nano_opt(3, 4, 5, 6)
            .unwrap();
        let civil = CivilDateTime::try_from(naive).unwrap();
        assert_eq!(NaiveDateTime::from(civil), naive);

        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 1_500_000_000)
            .unwrap();
        assert!(CivilDateTime::try_from(leap).is_err());
        assert!(CivilTime::try_from(leap.time()).is_err());

        let utc = DateTime::from_timestamp(1_000, 0).unwrap();
        let instant = Instant::try_from(utc).unwrap();
        assert_eq!(DateTime::<Utc>::from(instant), utc);
        let zoned = ZonedDateTime::from_utc_datetime(utc, ZoneId::UTC).unwrap();
        assert_eq!(zoned.to_instant(), instant);
        assert_eq!(CivilDate::from(naive.date()).to_string(), "2021-01-02");
    }
}
