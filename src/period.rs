// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar-relative amounts of time.
//!
//! A [`Period`] counts years, months and days.  Unlike a
//! [`Duration`](crate::Duration) it has no fixed length: one month after
//! January 31 is February 28 (or 29), and one day across a daylight-saving
//! change may last 23 or 25 hours.
//!
//! Fields are kept as given: `P14M` stays fourteen months until
//! [`Period::normalized`] folds it into `P1Y2M`.  Adding a period to a date
//! applies years and months together, clamping the day to the target month,
//! and then the days.
//!
//! ```
//! use tempozone::{CivilDate, Period};
//!
//! let start = CivilDate::of(2021, 1, 31).unwrap();
//! let end = start.plus_period(&Period::new(0, 1, 1)).unwrap();
//! assert_eq!(end.to_string(), "2021-03-01");
//! assert_eq!("P1Y2M3D".parse::<Period>().unwrap(), Period::new(1, 2, 3));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{TimeError, TimeResult};
use crate::CivilDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Years, months and days, each independently signed.
///
/// Equality is field-wise: `P12M` and `P1Y` are different periods until
/// [`normalized`](Period::normalized).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Period {
    years: i32,
    months: i32,
    days: i32,
}

fn overflow() -> TimeError {
    TimeError::RangeError("period overflow")
}

impl Period {
    /// `P0D`.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a period from independently signed fields.
    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// `years` calendar years.
    pub const fn of_years(years: i32) -> Self {
        Self::new(years, 0, 0)
    }

    /// `months` calendar months.
    pub const fn of_months(months: i32) -> Self {
        Self::new(0, months, 0)
    }

    /// Seven days per week; stored as days.
    ///
    /// # Errors
    ///
    /// [`TimeError::RangeError`] when the day count overflows `i32`.
    pub fn of_weeks(weeks: i32) -> TimeResult<Self> {
        weeks.checked_mul(7).map(Self::of_days).ok_or_else(overflow)
    }

    /// `days` calendar days; across a daylight-saving change a day need not
    /// last 24 hours.
    pub const fn of_days(days: i32) -> Self {
        Self::new(0, 0, days)
    }

    /// Calendar difference from `start` to `end`, in the largest units that
    /// do not overshoot.
    ///
    /// Whole months are counted first; the remaining days are measured from
    /// `start` advanced by those months.  Years and months share a sign with
    /// the days.
    pub fn between(start: CivilDate, end: CivilDate) -> Self {
        let mut total_months = (i64::from(end.year()) - i64::from(start.year())) * 12
            + (i64::from(end.month()) - i64::from(start.month()));
        let mut days = i64::from(end.day()) - i64::from(start.day());
        if total_months > 0 && days < 0 {
            total_months -= 1;
            days = start
                .plus_months(total_months)
                .map(|anchor| anchor.days_until(&end))
                .unwrap_or(days);
        } else if total_months < 0 && days > 0 {
            total_months += 1;
            days -= i64::from(end.length_of_month());
        }
        // The civil range keeps every field well inside i32.
        Self::new(
            (total_months / 12) as i32,
            (total_months % 12) as i32,
            days as i32,
        )
    }

    #[inline]
    pub const fn years(&self) -> i32 {
        self.years
    }

    #[inline]
    pub const fn months(&self) -> i32 {
        self.months
    }

    #[inline]
    pub const fn days(&self) -> i32 {
        self.days
    }

    /// Whether all three fields are zero.
    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// Whether any field is negative.
    pub const fn is_negative(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    /// `years * 12 + months`; days are ignored.
    pub fn to_total_months(&self) -> i64 {
        i64::from(self.years) * 12 + i64::from(self.months)
    }

    /// Field-wise sum without normalization.
    ///
    /// # Errors
    ///
    /// [`TimeError::RangeError`] when a field overflows.
    pub fn plus(&self, other: &Self) -> TimeResult<Self> {
        Ok(Self::new(
            self.years.checked_add(other.years).ok_or_else(overflow)?,
            self.months.checked_add(other.months).ok_or_else(overflow)?,
            self.days.checked_add(other.days).ok_or_else(overflow)?,
        ))
    }

    /// Field-wise difference without normalization.
    pub fn minus(&self, other: &Self) -> TimeResult<Self> {
        self.plus(&other.negated()?)
    }

    /// Every field negated; fails only for `i32::MIN` fields.
    pub fn negated(&self) -> TimeResult<Self> {
        self.multiplied_by(-1)
    }

    /// Every field scaled by `factor`.
    pub fn multiplied_by(&self, factor: i32) -> TimeResult<Self> {
        Ok(Self::new(
            self.years.checked_mul(factor).ok_or_else(overflow)?,
            self.months.checked_mul(factor).ok_or_else(overflow)?,
            self.days.checked_mul(factor).ok_or_else(overflow)?,
        ))
    }

    /// Fold months into years so that `|months| < 12`; days are untouched.
    pub fn normalized(&self) -> TimeResult<Self> {
        let total = self.to_total_months();
        let years = i32::try_from(total / 12).map_err(|_| overflow())?;
        Ok(Self::new(years, (total % 12) as i32, self.days))
    }
}

/// ISO-8601 period notation: `P1Y2M3D`, zero fields omitted, `P0D` for zero.
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

/// Accepts `[±]P[±nY][±nM][±nW][±nD]` with at least one field; weeks fold
/// into days and a leading minus negates every field.
impl FromStr for Period {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| TimeError::format(s, reason);
        let (negate, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let mut rest = rest
            .strip_prefix(['P', 'p'])
            .ok_or_else(|| err("expected 'P'"))?;
        if rest.is_empty() {
            return Err(err("period needs at least one field"));
        }

        const UNITS: [char; 4] = ['Y', 'M', 'W', 'D'];
        let mut fields = [0i32; 4];
        let mut next_unit = 0;
        while !rest.is_empty() {
            let sign_len = usize::from(rest.starts_with(['+', '-']));
            let digits = rest[sign_len..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            if digits == 0 {
                return Err(err("expected digits"));
            }
            let value: i32 = rest[..sign_len + digits]
                .parse()
                .map_err(|_| err("period field overflow"))?;
            rest = &rest[sign_len + digits..];
            let unit = rest
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .ok_or_else(|| err("missing unit designator"))?;
            let index = UNITS[next_unit..]
                .iter()
                .position(|&u| u == unit)
                .map(|i| i + next_unit)
                .ok_or_else(|| err("unit designators out of order"))?;
            fields[index] = value;
            next_unit = index + 1;
            rest = &rest[1..];
        }

        let [years, months, weeks, days] = fields;
        let days = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(days))
            .ok_or_else(|| err("period field overflow"))?;
        let period = Self::new(years, months, days);
        if negate {
            period.negated()
        } else {
            Ok(period)
        }
    }
}
