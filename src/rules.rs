// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zone rules and local-time resolution.
//!
//! A zone's rules map every instant to exactly one UTC offset.  The reverse
//! direction is not a function: around a transition a civil time can have
//! no valid offset (a [`LocalOffsets::Gap`], clocks jumped forward) or two
//! (a [`LocalOffsets::Overlap`], clocks fell back).  This module classifies
//! civil times and resolves them with an explicit [`Disambiguation`] policy.
//!
//! # Resolution
//!
//! Let `L` be the civil time read as if it were UTC.  The rules are probed at
//! `L - 1 day` and `L + 1 day`; a candidate offset `o` is valid iff the
//! rules give `o` at instant `L - o`.  This assumes at most one transition in
//! any two-day window, which holds for all real-world zone data.

use std::fmt;

use tracing::trace;

use crate::error::{TimeError, TimeResult};
use crate::{CivilDateTime, Duration, Instant, UtcOffset};

// ═══════════════════════════════════════════════════════════════════════════
// ZoneRules
// ═══════════════════════════════════════════════════════════════════════════

/// A provider of UTC offsets for one zone.
pub trait ZoneRules {
    /// The offset in effect at `instant`.
    fn offset_at(&self, instant: Instant) -> UtcOffset;

    /// Every offset valid for `civil`, classified.
    fn local_offsets(&self, civil: &CivilDateTime) -> LocalOffsets {
        probe_local_offsets(self, civil)
    }
}

pub(crate) fn probe_local_offsets<R: ZoneRules + ?Sized>(
    rules: &R,
    civil: &CivilDateTime,
) -> LocalOffsets {
    let local = civil.local_nanos();
    let at = |offset_nanos: i128| Instant::saturating_nanos(local - offset_nanos);
    let valid = |offset: UtcOffset| rules.offset_at(at(offset_nanos(offset))) == offset;

    let day = Duration::of_days(1).total_nanos();
    let before = rules.offset_at(at(day));
    let after = rules.offset_at(at(-day));

    if before == after {
        if valid(before) {
            return LocalOffsets::Normal(before);
        }
        // A transition back and forth inside the window; fall back to the
        // offset found at `L - before`.
        let probe = rules.offset_at(at(offset_nanos(before)));
        if valid(probe) {
            return LocalOffsets::Normal(probe);
        }
        return LocalOffsets::Gap {
            before,
            after: probe,
        };
    }

    match (valid(before), valid(after)) {
        (true, true) => LocalOffsets::Overlap {
            earlier: before.max(after),
            later: before.min(after),
        },
        (true, false) => LocalOffsets::Normal(before),
        (false, true) => LocalOffsets::Normal(after),
        (false, false) => LocalOffsets::Gap { before, after },
    }
}

fn offset_nanos(offset: UtcOffset) -> i128 {
    i128::from(offset.seconds()) * 1_000_000_000
}

// ═══════════════════════════════════════════════════════════════════════════
// LocalOffsets
// ═══════════════════════════════════════════════════════════════════════════

/// Classification of a civil time within a zone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LocalOffsets {
    /// Exactly one offset is valid.
    Normal(UtcOffset),
    /// No offset is valid: the wall clock skipped this time.
    Gap {
        /// Offset in effect before the transition.
        before: UtcOffset,
        /// Offset in effect after the transition.
        after: UtcOffset,
    },
    /// Two offsets are valid: the wall clock repeated this time.
    Overlap {
        /// The offset giving the earlier instant (the pre-transition one).
        earlier: UtcOffset,
        /// The offset giving the later instant.
        later: UtcOffset,
    },
}

impl LocalOffsets {
    /// The valid offsets, earlier instant first.
    pub fn valid_offsets(&self) -> Vec<UtcOffset> {
        match *self {
            LocalOffsets::Normal(offset) => vec![offset],
            LocalOffsets::Gap { .. } => Vec::new(),
            LocalOffsets::Overlap { earlier, later } => vec![earlier, later],
        }
    }

    pub fn contains(&self, offset: UtcOffset) -> bool {
        match *self {
            LocalOffsets::Normal(valid) => valid == offset,
            LocalOffsets::Gap { .. } => false,
            LocalOffsets::Overlap { earlier, later } => offset == earlier || offset == later,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, LocalOffsets::Normal(_))
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, LocalOffsets::Gap { .. })
    }

    pub fn is_overlap(&self) -> bool {
        matches!(self, LocalOffsets::Overlap { .. })
    }

    /// How far the wall clock jumps (gap) or repeats (overlap); zero when
    /// normal.
    pub fn transition_length(&self) -> Duration {
        match *self {
            LocalOffsets::Normal(_) => Duration::ZERO,
            LocalOffsets::Gap { before, after } => {
                Duration::of_seconds(i64::from(after.seconds()) - i64::from(before.seconds()))
            }
            LocalOffsets::Overlap { earlier, later } => {
                Duration::of_seconds(i64::from(earlier.seconds()) - i64::from(later.seconds()))
            }
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            LocalOffsets::Normal(_) => "normal",
            LocalOffsets::Gap { .. } => "in a gap",
            LocalOffsets::Overlap { .. } => "in an overlap",
        }
    }

    /// The offset used to read `civil` as an instant under `policy`.
    ///
    /// In a gap the returned offset is not valid for `civil` itself: reading
    /// the civil time with the pre-transition offset lands after the gap,
    /// shifted forward by its length.
    pub fn resolve(
        &self,
        civil: &CivilDateTime,
        zone: &dyn fmt::Display,
        policy: Disambiguation,
    ) -> TimeResult<UtcOffset> {
        let chosen = match (*self, policy) {
            (LocalOffsets::Normal(offset), _) => return Ok(offset),
            (_, Disambiguation::Reject) => {
                return Err(TimeError::AmbiguousZoneResolution {
                    civil: civil.to_string(),
                    zone: zone.to_string(),
                    kind: self.kind(),
                })
            }
            (LocalOffsets::Overlap { later, .. }, Disambiguation::Later) => later,
            (LocalOffsets::Overlap { earlier, .. }, _) => earlier,
            (LocalOffsets::Gap { after, .. }, Disambiguation::Earlier) => after,
            (LocalOffsets::Gap { before, .. }, _) => before,
        };
        trace!(
            civil = %civil,
            zone = %zone,
            kind = self.kind(),
            policy = ?policy,
            offset = %chosen,
            "resolved ambiguous local time"
        );
        Ok(chosen)
    }
}

/// How a civil time in a gap or an overlap is turned into an instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Disambiguation {
    /// Earlier instant at an overlap; shift forward by the gap length in a
    /// gap.
    #[default]
    Compatible,
    /// The earlier of the candidate instants.
    Earlier,
    /// The later of the candidate instants.
    Later,
    /// Fail with [`TimeError::AmbiguousZoneResolution`].
    Reject,
}

// ═══════════════════════════════════════════════════════════════════════════
// TransitionTable
// ═══════════════════════════════════════════════════════════════════════════

/// One offset change: from `at` onwards the zone observes `offset`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub at: Instant,
    pub offset: UtcOffset,
}

impl Transition {
    pub fn new(at: Instant, offset: UtcOffset) -> Self {
        Self { at, offset }
    }
}

/// Caller-supplied zone rules: an initial offset and a sorted list of
/// transitions.
///
/// Useful for modelling rules that differ from the bundled database, such as
/// a government changing its daylight-saving policy after data was stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionTable {
    name: String,
    initial: UtcOffset,
    transitions: Vec<Transition>,
}

impl TransitionTable {
    /// Fails with [`TimeError::InvalidTransitions`] unless the transition
    /// instants are strictly increasing.
    pub fn new(
        name: impl Into<String>,
        initial: UtcOffset,
        transitions: Vec<Transition>,
    ) -> TimeResult<Self> {
        if transitions.windows(2).any(|pair| pair[0].at >= pair[1].at) {
            return Err(TimeError::InvalidTransitions);
        }
        Ok(Self {
            name: name.into(),
            initial,
            transitions,
        })
    }

    /// A table without transitions.
    pub fn fixed(name: impl Into<String>, offset: UtcOffset) -> Self {
        Self {
            name: name.into(),
            initial: offset,
            transitions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_offset(&self) -> UtcOffset {
        self.initial
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

impl ZoneRules for TransitionTable {
    fn offset_at(&self, instant: Instant) -> UtcOffset {
        let applied = self.transitions.partition_point(|t| t.at <= instant);
        match applied {
            0 => self.initial,
            n => self.transitions[n - 1].offset,
        }
    }
}
