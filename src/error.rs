// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for tempozone.

use thiserror::Error;

/// Errors produced while constructing or combining time values.
///
/// Every failure is local and synchronous: nothing here is transient, so
/// nothing is worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Calendar fields do not form a valid proleptic-Gregorian date or time.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// An interval or range was built with its end before its start.
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange { start: String, end: String },

    /// Arithmetic left the representable range.
    #[error("value out of range: {0}")]
    RangeError(&'static str),

    /// Strict resolution was requested but the civil time is in a gap or an
    /// overlap of the zone.
    #[error("{civil} is {kind} in zone {zone}")]
    AmbiguousZoneResolution {
        civil: String,
        zone: String,
        kind: &'static str,
    },

    /// A UTC offset outside ±18:00.
    #[error("invalid UTC offset: {0} seconds")]
    InvalidOffset(i32),

    /// No zone is known under this identifier.
    #[error("unknown time zone: {0}")]
    UnknownZone(String),

    /// Text could not be parsed.
    #[error("cannot parse {input:?}: {reason}")]
    InvalidFormat { input: String, reason: &'static str },

    /// A parsed offset is not valid for the parsed zone and the caller asked
    /// for conflicts to be rejected.
    #[error("offset {offset} is not valid for {civil} in zone {zone}")]
    OffsetConflict {
        civil: String,
        offset: String,
        zone: String,
    },

    /// A custom transition table is not strictly increasing.
    #[error("zone transitions must be strictly increasing")]
    InvalidTransitions,
}

impl TimeError {
    pub(crate) fn format(input: &str, reason: &'static str) -> Self {
        TimeError::InvalidFormat {
            input: input.to_owned(),
            reason,
        }
    }
}

/// Result type for tempozone operations.
pub type TimeResult<T> = Result<T, TimeError>;
