// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fixed UTC offsets.
//!
//! A [`UtcOffset`] is the difference between a civil reading and UTC at one
//! moment.  It carries no rules: a zone maps each instant to one of these,
//! and a civil value becomes an instant only once an offset is chosen.
//!
//! Text uses the ISO-8601 extended form.  Zero is written `Z`; seconds are
//! written only when non-zero.
//!
//! ```
//! use tempozone::UtcOffset;
//!
//! let india: UtcOffset = "+05:30".parse().unwrap();
//! assert_eq!(india.seconds(), 19_800);
//! assert_eq!(UtcOffset::from_hms(-3, -30, 0).unwrap().to_string(), "-03:30");
//! assert_eq!(UtcOffset::UTC.to_string(), "Z");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::duration::Duration;
use crate::error::{TimeError, TimeResult};
use crate::fmt::{write_offset, Cursor};

const MAX_SECONDS: i32 = 18 * 3_600;

/// A signed offset from UTC in whole seconds, within `-18:00..=+18:00`.
///
/// `civil = instant + offset`.  Ordered numerically, so `-05:00 < Z < +01:00`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UtcOffset {
    seconds: i32,
}

impl UtcOffset {
    /// The zero offset, written `Z`.
    pub const UTC: Self = Self { seconds: 0 };
    /// `-18:00`, the most negative offset accepted.
    pub const MIN: Self = Self {
        seconds: -MAX_SECONDS,
    };
    /// `+18:00`, the most positive offset accepted.
    pub const MAX: Self = Self {
        seconds: MAX_SECONDS,
    };

    /// Creates an offset from a signed number of seconds east of UTC.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidOffset`] when `|seconds|` exceeds 18 hours.
    pub fn from_seconds(seconds: i32) -> TimeResult<Self> {
        if !(-MAX_SECONDS..=MAX_SECONDS).contains(&seconds) {
            return Err(TimeError::InvalidOffset(seconds));
        }
        Ok(Self { seconds })
    }

    /// Creates a whole-hour offset, e.g. `from_hours(-5)` for `-05:00`.
    pub fn from_hours(hours: i32) -> TimeResult<Self> {
        let seconds = hours
            .checked_mul(3_600)
            .ok_or(TimeError::InvalidOffset(i32::MAX))?;
        Self::from_seconds(seconds)
    }

    /// Hours, minutes and seconds; all three must share a sign.
    ///
    /// `from_hms(-3, -30, 0)` is `-03:30`.  Mixing signs, or minutes or
    /// seconds beyond 59, fails with [`TimeError::InvalidOffset`].
    pub fn from_hms(hours: i32, minutes: i32, seconds: i32) -> TimeResult<Self> {
        let total = hours
            .saturating_mul(3_600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(seconds);
        let signs = [hours.signum(), minutes.signum(), seconds.signum()];
        if (signs.contains(&1) && signs.contains(&-1)) || minutes.abs() > 59 || seconds.abs() > 59 {
            return Err(TimeError::InvalidOffset(total));
        }
        Self::from_seconds(total)
    }

    /// Callers guarantee `|seconds| <= 18h`.
    pub(crate) const fn from_seconds_unchecked(seconds: i32) -> Self {
        Self { seconds }
    }

    /// Total signed seconds east of UTC.
    #[inline]
    pub const fn seconds(&self) -> i32 {
        self.seconds
    }

    /// Whether this is the zero offset.
    pub const fn is_utc(&self) -> bool {
        self.seconds == 0
    }

    /// The offset as an exact [`Duration`]; negative west of UTC.
    pub fn as_duration(&self) -> Duration {
        Duration::of_seconds(i64::from(self.seconds))
    }
}

/// `Z` for zero, otherwise `±HH:MM` with `:SS` appended when non-zero.
impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_offset(f, *self)
    }
}

/// Accepts `Z`, `z`, `±HH`, `±HH:MM`, `±HHMM`, `±HH:MM:SS` and `±HHMMSS`.
impl FromStr for UtcOffset {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        let offset = cursor
            .offset()?
            .ok_or_else(|| cursor.error("expected UTC offset"))?;
        cursor.finish()?;
        Ok(offset)
    }
}

impl TryFrom<chrono::FixedOffset> for UtcOffset {
    type Error = TimeError;

    fn try_from(offset: chrono::FixedOffset) -> TimeResult<Self> {
        Self::from_seconds(offset.local_minus_utc())
    }
}

crate::serde_as_string!(UtcOffset);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(UtcOffset::from_hours(18).unwrap(), UtcOffset::MAX);
        assert_eq!(UtcOffset::from_hours(-18).unwrap(), UtcOffset::MIN);
        assert_eq!(
            UtcOffset::from_seconds(18 * 3_600 + 1),
            Err(TimeError::InvalidOffset(64_801))
        );
        assert!(UtcOffset::from_hours(i32::MAX).is_err());
    }

    #[test]
    fn test_from_hms_signs() {
        assert_eq!(UtcOffset::from_hms(5, 30, 0).unwrap().seconds(), 19_800);
        assert_eq!(UtcOffset::from_hms(-3, -30, 0).unwrap().seconds(), -12_600);
        assert!(UtcOffset::from_hms(-3, 30, 0).is_err());
        assert!(UtcOffset::from_hms(1, 60, 0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(UtcOffset::UTC.to_string(), "Z");
        assert_eq!(UtcOffset::from_hours(2).unwrap().to_string(), "+02:00");
        assert_eq!(UtcOffset::from_hms(-9, -30, 0).unwrap().to_string(), "-09:30");
        assert_eq!(UtcOffset::from_seconds(1_234).unwrap().to_string(), "+00:20:34");
    }

    #[test]
    fn test_parse() {
        assert_eq!("Z".parse::<UtcOffset>().unwrap(), UtcOffset::UTC);
        assert_eq!("+00:00".parse::<UtcOffset>().unwrap(), UtcOffset::UTC);
        assert_eq!("+0530".parse::<UtcOffset>().unwrap().seconds(), 19_800);
        assert_eq!("-08".parse::<UtcOffset>().unwrap().seconds(), -28_800);
        assert_eq!("+00:20:34".parse::<UtcOffset>().unwrap().seconds(), 1_234);
        assert!("+19:00".parse::<UtcOffset>().is_err());
        assert!("02:00".parse::<UtcOffset>().is_err());
        assert!("+02:00x".parse::<UtcOffset>().is_err());
    }

    #[test]
    fn test_ordering() {
        let west = UtcOffset::from_hours(-5).unwrap();
        let east = UtcOffset::from_hours(1).unwrap();
        assert!(west < UtcOffset::UTC && UtcOffset::UTC < east);
        assert_eq!(east.as_duration(), Duration::of_hours(1));
    }
}
