// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil date-times bound to a zone.
//!
//! A [`ZonedDateTime`] holds a civil value, the zone it was read in and the
//! offset the zone's rules assign to it.  The three together pin down one
//! instant, which is stored alongside.
//!
//! Two kinds of arithmetic are offered and they differ across transitions:
//!
//! - [`plus_duration`](ZonedDateTime::plus_duration) and
//!   [`plus`](ZonedDateTime::plus) move along the time line by exact amounts
//!   and read the result back in the zone.
//! - [`plus_period`](ZonedDateTime::plus_period) moves the civil fields and
//!   then re-resolves the offset, keeping the current one when still valid.
//!
//! So one day after `2021-03-27T12:00+01:00[Europe/Warsaw]` is
//! `2021-03-28T13:00+02:00` as a duration but `2021-03-28T12:00+02:00` as a
//! period.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::duration::{Duration, Unit, NANOS_PER_SECOND};
use crate::error::{TimeError, TimeResult};
use crate::fmt::{OffsetConflict, ParsedZoned};
use crate::rules::{Disambiguation, LocalOffsets, ZoneRules};
use crate::{CivilDate, CivilDateTime, CivilTime, Instant, Period, UtcOffset, Weekday, ZoneId};

/// A civil date-time in a zone, with its resolved UTC offset.
///
/// Equality compares the civil value, offset and zone; two values for the
/// same instant in different zones are not equal.  Use
/// [`to_instant`](Self::to_instant) or [`is_before`](Self::is_before) to
/// compare positions on the time line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    civil: CivilDateTime,
    offset: UtcOffset,
    zone: ZoneId,
    instant: Instant,
}

impl ZonedDateTime {
    // ── constructors ──────────────────────────────────────────────────

    /// Resolve `civil` in `zone` with [`Disambiguation::Compatible`]: the
    /// earlier offset in an overlap, shifted forward by the gap length in a
    /// gap.
    ///
    /// Never fails; civil values whose instant falls outside the supported
    /// range are clamped to [`Instant::MIN`] or [`Instant::MAX`].
    pub fn of(civil: CivilDateTime, zone: ZoneId) -> Self {
        match Self::of_with(civil, zone.clone(), Disambiguation::Compatible) {
            Ok(zoned) => zoned,
            Err(_) => Self::of_instant(Instant::saturating_nanos(civil.local_nanos()), zone),
        }
    }

    /// Resolve `civil` in `zone` with an explicit policy.
    pub fn of_with(
        civil: CivilDateTime,
        zone: ZoneId,
        policy: Disambiguation,
    ) -> TimeResult<Self> {
        let offsets = zone.local_offsets(&civil);
        let offset = offsets.resolve(&civil, &zone, policy)?;
        let instant = civil.to_instant(offset)?;
        Ok(Self::of_instant(instant, zone))
    }

    /// Fails with [`TimeError::AmbiguousZoneResolution`] if `civil` is in a
    /// gap or an overlap.
    pub fn of_strict(civil: CivilDateTime, zone: ZoneId) -> TimeResult<Self> {
        Self::of_with(civil, zone, Disambiguation::Reject)
    }

    /// View `instant` in `zone`.  Never fails.
    pub fn of_instant(instant: Instant, zone: ZoneId) -> Self {
        let offset = zone.offset_at(instant);
        let local = instant.total_nanos() + i128::from(offset.seconds()) * i128::from(NANOS_PER_SECOND);
        let civil = CivilDateTime::from_local_nanos(local)
            .expect("supported instant range is viewable at every offset");
        Self {
            civil,
            offset,
            zone,
            instant,
        }
    }

    /// The current instant in `zone`.
    pub fn now(zone: ZoneId) -> Self {
        Self::of_instant(Instant::now(), zone)
    }

    /// The first instant of `date` in `zone`.
    ///
    /// Usually midnight; when midnight is skipped by a transition, the
    /// first wall-clock time after the gap.
    pub fn start_of_day(date: CivilDate, zone: ZoneId) -> Self {
        let midnight = date.at_start_of_day();
        match zone.local_offsets(&midnight) {
            LocalOffsets::Gap { before, after } => {
                let local = midnight.local_nanos();
                let nanos = |offset: UtcOffset| i128::from(offset.seconds()) * i128::from(NANOS_PER_SECOND);
                let lo = Instant::saturating_nanos(local - nanos(after));
                let hi = Instant::saturating_nanos(local - nanos(before));
                Self::of_instant(first_instant_with_offset(&zone, lo, hi, after), zone)
            }
            _ => Self::of(midnight, zone),
        }
    }

    /// Keep `preferred` when it is valid for `civil`, otherwise resolve with
    /// the default policy.
    fn resolve_local(
        civil: CivilDateTime,
        zone: ZoneId,
        preferred: UtcOffset,
    ) -> TimeResult<Self> {
        let offsets = zone.local_offsets(&civil);
        if offsets.contains(preferred) {
            if offsets.is_overlap() {
                trace!(civil = %civil, zone = %zone, offset = %preferred, "kept offset at overlap");
            }
            let instant = civil.to_instant(preferred)?;
            return Ok(Self {
                civil,
                offset: preferred,
                zone,
                instant,
            });
        }
        Self::of_with(civil, zone, Disambiguation::Compatible)
    }

    // ── text ──────────────────────────────────────────────────────────

    /// Parse `civil offset[zone]` text, settling any offset/zone conflict
    /// with `conflict`.
    pub fn parse_with(text: &str, conflict: OffsetConflict) -> TimeResult<Self> {
        ParsedZoned::parse(text)?.into_zoned(conflict)
    }

    // ── conversions ───────────────────────────────────────────────────

    #[inline]
    pub fn to_instant(&self) -> Instant {
        self.instant
    }

    /// Same instant, viewed in another zone.
    pub fn with_zone_same_instant(&self, zone: ZoneId) -> Self {
        Self::of_instant(self.instant, zone)
    }

    /// Same wall-clock reading in another zone, keeping the current offset
    /// when the new zone allows it.
    pub fn with_zone_same_local(&self, zone: ZoneId) -> TimeResult<Self> {
        Self::resolve_local(self.civil, zone, self.offset)
    }

    /// Replace the zone by the current offset as a fixed zone.
    pub fn with_fixed_offset_zone(&self) -> Self {
        Self {
            zone: ZoneId::Fixed(self.offset),
            ..self.clone()
        }
    }

    /// At an overlap, switch to the offset giving the earlier instant;
    /// otherwise unchanged.
    pub fn with_earlier_offset_at_overlap(&self) -> Self {
        match self.zone.local_offsets(&self.civil) {
            LocalOffsets::Overlap { earlier, .. } => self.with_offset(earlier),
            _ => self.clone(),
        }
    }

    /// At an overlap, switch to the offset giving the later instant;
    /// otherwise unchanged.
    pub fn with_later_offset_at_overlap(&self) -> Self {
        match self.zone.local_offsets(&self.civil) {
            LocalOffsets::Overlap { later, .. } => self.with_offset(later),
            _ => self.clone(),
        }
    }

    /// Unchanged when the switched instant would leave the supported range.
    fn with_offset(&self, offset: UtcOffset) -> Self {
        match self.civil.to_instant(offset) {
            Ok(instant) => Self {
                offset,
                instant,
                ..self.clone()
            },
            Err(err) => {
                debug!(
                    civil = %self.civil,
                    zone = %self.zone,
                    offset = %offset,
                    error = %err,
                    "overlap offset not applied"
                );
                self.clone()
            }
        }
    }

    // ── field adjusters ───────────────────────────────────────────────
    //
    // Replace one civil field, then re-resolve like `plus_period`: the
    // current offset is kept when still valid, otherwise the default
    // policy applies.

    fn with_civil(&self, civil: TimeResult<CivilDateTime>) -> TimeResult<Self> {
        Self::resolve_local(civil?, self.zone.clone(), self.offset)
    }

    pub fn with_year(&self, year: i32) -> TimeResult<Self> {
        self.with_civil(self.civil.with_year(year))
    }

    pub fn with_month(&self, month: u32) -> TimeResult<Self> {
        self.with_civil(self.civil.with_month(month))
    }

    pub fn with_day(&self, day: u32) -> TimeResult<Self> {
        self.with_civil(self.civil.with_day(day))
    }

    /// A new hour may land in a gap, which shifts the result forward.
    pub fn with_hour(&self, hour: u32) -> TimeResult<Self> {
        self.with_civil(self.civil.with_hour(hour))
    }

    pub fn with_minute(&self, minute: u32) -> TimeResult<Self> {
        self.with_civil(self.civil.with_minute(minute))
    }

    pub fn with_second(&self, second: u32) -> TimeResult<Self> {
        self.with_civil(self.civil.with_second(second))
    }

    pub fn with_nanosecond(&self, nanosecond: u32) -> TimeResult<Self> {
        self.with_civil(self.civil.with_nanosecond(nanosecond))
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Exact time-line advancement.
    pub fn plus_duration(&self, duration: Duration) -> TimeResult<Self> {
        let instant = self.instant.plus_duration(duration)?;
        Ok(Self::of_instant(instant, self.zone.clone()))
    }

    pub fn minus_duration(&self, duration: Duration) -> TimeResult<Self> {
        let instant = self.instant.minus_duration(duration)?;
        Ok(Self::of_instant(instant, self.zone.clone()))
    }

    /// Exact time-line advancement; [`Unit::Days`] are 24-hour days.
    pub fn plus(&self, amount: i64, unit: Unit) -> TimeResult<Self> {
        let instant = self.instant.plus(amount, unit)?;
        Ok(Self::of_instant(instant, self.zone.clone()))
    }

    pub fn minus(&self, amount: i64, unit: Unit) -> TimeResult<Self> {
        let instant = self.instant.minus(amount, unit)?;
        Ok(Self::of_instant(instant, self.zone.clone()))
    }

    /// Calendar advancement of the civil fields, then re-resolution.
    pub fn plus_period(&self, period: &Period) -> TimeResult<Self> {
        let civil = self.civil.plus_period(period)?;
        Self::resolve_local(civil, self.zone.clone(), self.offset)
    }

    pub fn minus_period(&self, period: &Period) -> TimeResult<Self> {
        let civil = self.civil.minus_period(period)?;
        Self::resolve_local(civil, self.zone.clone(), self.offset)
    }

    /// Truncate the civil fields, then re-resolve keeping the offset if
    /// possible.
    pub fn truncated_to(&self, unit: Unit) -> Self {
        let civil = self.civil.truncated_to(unit);
        Self::resolve_local(civil, self.zone.clone(), self.offset)
            .unwrap_or_else(|_| Self::of(civil, self.zone.clone()))
    }

    /// Exact time from `self` to `other`.
    pub fn duration_until(&self, other: &Self) -> Duration {
        Duration::between(self.instant, other.instant)
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self.instant < other.instant
    }

    pub fn is_after(&self, other: &Self) -> bool {
        self.instant > other.instant
    }

    // ── accessors ─────────────────────────────────────────────────────

    pub fn civil(&self) -> CivilDateTime {
        self.civil
    }

    pub fn date(&self) -> CivilDate {
        self.civil.date()
    }

    pub fn time(&self) -> CivilTime {
        self.civil.time()
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    pub fn year(&self) -> i32 {
        self.civil.year()
    }

    pub fn month(&self) -> u32 {
        self.civil.month()
    }

    pub fn day(&self) -> u32 {
        self.civil.day()
    }

    pub fn hour(&self) -> u32 {
        self.civil.hour()
    }

    pub fn minute(&self) -> u32 {
        self.civil.minute()
    }

    pub fn second(&self) -> u32 {
        self.civil.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.civil.nanosecond()
    }

    pub fn weekday(&self) -> Weekday {
        self.civil.weekday()
    }

    pub fn day_of_year(&self) -> u32 {
        self.civil.day_of_year()
    }
}

/// Earliest instant in `(lo, hi]` at which `zone` observes `target`, given
/// that it does at `hi` and not at `lo`.
fn first_instant_with_offset(zone: &ZoneId, lo: Instant, hi: Instant, target: UtcOffset) -> Instant {
    let (mut lo, mut hi) = (lo.total_nanos(), hi.total_nanos());
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if zone.offset_at(Instant::saturating_nanos(mid)) == target {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Instant::saturating_nanos(hi)
}

/// `civil` + offset, then `[zone]` unless the zone is a fixed offset.
impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.civil, self.offset)?;
        if !self.zone.is_fixed_offset() {
            write!(f, "[{}]", self.zone)?;
        }
        Ok(())
    }
}

/// Parses with [`OffsetConflict::UseOffset`]: the literal offset fixes the
/// instant.
///
/// Only fixed offsets and IANA names resolve.  Text written from a
/// [`ZoneId::Custom`] zone fails here (and under serde) with
/// [`TimeError::UnknownZone`]; decode it with [`ParsedZoned::parse`] and
/// [`ParsedZoned::resolve`] against the rebuilt zone.
impl FromStr for ZonedDateTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, OffsetConflict::default())
    }
}

crate::serde_as_string!(ZonedDateTime);
