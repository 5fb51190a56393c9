// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil and zoned date-time primitives.
//!
//! This crate provides immutable value types for points in time, wall-clock
//! readings and the zones that connect them, with explicit handling of the
//! UTC-offset ambiguity at daylight-saving transitions.
//!
//! # Core types
//!
//! - [`Instant`]: a point on the time line, independent of offsets and zones.
//! - [`CivilDateTime`], [`CivilDate`], [`CivilTime`]: wall-clock values with no zone.
//! - [`UtcOffset`]: a fixed distance from UTC within ±18:00.
//! - [`ZoneId`]: a fixed offset, an IANA region or caller-supplied [`TransitionTable`].
//! - [`ZoneRules`]: trait mapping instants to offsets and classifying civil times
//!   as [`LocalOffsets::Normal`], [`LocalOffsets::Gap`] or [`LocalOffsets::Overlap`].
//! - [`ZonedDateTime`]: a civil value bound to a zone and its resolved offset.
//! - [`Duration`]: exact elapsed time; [`Period`]: calendar years, months and days.
//! - [`Interval<T>`]: half-open `[start, end)` over any [`TimeInstant`].
//! - [`DateRange`]: dates with an explicit closed or half-open end.
//!
//! # Zone resolution
//!
//! | Moment | Valid offsets | Default ([`Disambiguation::Compatible`]) |
//! |--------|---------------|------------------------------------------|
//! | Normal | one | that offset |
//! | Gap | none | shift the wall clock forward by the gap length |
//! | Overlap | two | the earlier instant |
//!
//! There is no ambient default zone: every conversion takes a [`ZoneId`].
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for every value type.  Text-shaped
//!   values use their ISO-8601 form.  A [`ZoneId::Custom`] zone, alone or
//!   inside a [`ZonedDateTime`], serializes by name but cannot be
//!   deserialized from it; use [`ParsedZoned::resolve`] with the rebuilt zone.

/// Serialize through `Display` and deserialize through `FromStr`.
macro_rules! serde_as_string {
    ($($ty:ty),+ $(,)?) => {$(
        #[cfg(feature = "serde")]
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    )+};
}
pub(crate) use serde_as_string;

mod civil;
mod duration;
mod error;
mod fmt;
mod instant;
mod interval;
mod offset;
mod period;
mod range;
mod rules;
pub mod storage;
mod zone;
mod zoned;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use chrono::Weekday;
pub use civil::{CivilDate, CivilDateTime, CivilTime};
pub use duration::{Duration, Unit};
pub use error::{TimeError, TimeResult};
pub use fmt::{OffsetConflict, ParsedZoned};
pub use instant::{Instant, TimeInstant};
pub use interval::{complement_within, intersect_intervals, Interval};
pub use offset::UtcOffset;
pub use period::Period;
pub use range::DateRange;
pub use rules::{Disambiguation, LocalOffsets, Transition, TransitionTable, ZoneRules};
pub use zone::{ZoneDb, ZoneId};
pub use zoned::ZonedDateTime;
