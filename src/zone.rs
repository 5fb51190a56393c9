// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zone identifiers and the bundled IANA zone index.

use chrono::{Offset, TimeZone};
use chrono_tz::{Tz, TZ_VARIANTS};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{TimeError, TimeResult};
use crate::rules::{LocalOffsets, TransitionTable, ZoneRules};
use crate::{CivilDateTime, Instant, UtcOffset};

// ═══════════════════════════════════════════════════════════════════════════
// ZoneId
// ═══════════════════════════════════════════════════════════════════════════

/// A zone: a fixed offset, an IANA region, or caller-supplied rules.
///
/// Every `ZoneId` implements [`ZoneRules`].  There is no ambient default
/// zone; conversions always take one explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneId {
    /// A constant offset such as `+01:00`; never has gaps or overlaps.
    Fixed(UtcOffset),
    /// A region from the bundled IANA database, e.g. `Europe/Warsaw`.
    Region(Tz),
    /// Rules supplied by the caller.
    Custom(Arc<TransitionTable>),
}

impl ZoneId {
    pub const UTC: Self = ZoneId::Fixed(UtcOffset::UTC);

    /// Look up `Z`, a numeric offset such as `+05:30`, or an IANA region.
    pub fn of(id: &str) -> TimeResult<Self> {
        if id == "Z" || id.starts_with(['+', '-']) {
            return id
                .parse()
                .map(ZoneId::Fixed)
                .map_err(|_| TimeError::UnknownZone(id.to_owned()));
        }
        ZoneDb::global()
            .get(id)
            .ok_or_else(|| TimeError::UnknownZone(id.to_owned()))
    }

    pub fn custom(table: TransitionTable) -> Self {
        ZoneId::Custom(Arc::new(table))
    }

    pub fn name(&self) -> Cow<'_, str> {
        match self {
            ZoneId::Fixed(offset) => Cow::Owned(offset.to_string()),
            ZoneId::Region(tz) => Cow::Borrowed(tz.name()),
            ZoneId::Custom(table) => Cow::Borrowed(table.name()),
        }
    }

    pub fn is_fixed_offset(&self) -> bool {
        matches!(self, ZoneId::Fixed(_))
    }
}

impl ZoneRules for ZoneId {
    fn offset_at(&self, instant: Instant) -> UtcOffset {
        match self {
            ZoneId::Fixed(offset) => *offset,
            ZoneId::Region(tz) => {
                let seconds = tz
                    .offset_from_utc_datetime(&instant.to_naive_utc())
                    .fix()
                    .local_minus_utc();
                // IANA offsets stay within ±15:00.
                UtcOffset::from_seconds_unchecked(seconds)
            }
            ZoneId::Custom(table) => table.offset_at(instant),
        }
    }

    fn local_offsets(&self, civil: &CivilDateTime) -> LocalOffsets {
        match self {
            ZoneId::Fixed(offset) => LocalOffsets::Normal(*offset),
            _ => crate::rules::probe_local_offsets(self, civil),
        }
    }
}

impl From<UtcOffset> for ZoneId {
    fn from(offset: UtcOffset) -> Self {
        ZoneId::Fixed(offset)
    }
}

impl From<Tz> for ZoneId {
    fn from(tz: Tz) -> Self {
        ZoneId::Region(tz)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Accepts what [`ZoneId::of`] accepts.  A [`ZoneId::Custom`] zone
/// displays its table name, which does not parse back: its rules are not
/// registered anywhere.
impl FromStr for ZoneId {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

// Serializes by name.  Deserializing the name of a custom zone fails with
// `UnknownZone`; rebuild such zones from their `TransitionTable`.
crate::serde_as_string!(ZoneId);

// ═══════════════════════════════════════════════════════════════════════════
// ZoneDb
// ═══════════════════════════════════════════════════════════════════════════

/// Process-wide index of the IANA zones bundled with `chrono-tz`.
///
/// Built lazily on first use and read-only afterwards.
#[derive(Debug)]
pub struct ZoneDb {
    zones: BTreeMap<&'static str, Tz>,
}

static ZONE_DB: OnceLock<ZoneDb> = OnceLock::new();

impl ZoneDb {
    pub fn global() -> &'static ZoneDb {
        ZONE_DB.get_or_init(|| {
            let zones: BTreeMap<_, _> = TZ_VARIANTS.iter().map(|tz| (tz.name(), *tz)).collect();
            debug!(zones = zones.len(), "built IANA zone index");
            ZoneDb { zones }
        })
    }

    /// Exact, case-sensitive lookup of a region name or alias.
    pub fn get(&self, name: &str) -> Option<ZoneId> {
        self.zones.get(name).copied().map(ZoneId::Region)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zones.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Every known name, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.zones.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(text: &str) -> CivilDateTime {
        text.parse().unwrap()
    }

    fn offset(hours: i32) -> UtcOffset {
        UtcOffset::from_hours(hours).unwrap()
    }

    #[test]
    fn test_of_parses_every_form() {
        assert_eq!(ZoneId::of("Z").unwrap(), ZoneId::UTC);
        assert_eq!(ZoneId::of("+01:00").unwrap(), ZoneId::Fixed(offset(1)));
        assert_eq!(ZoneId::of("Europe/Warsaw").unwrap(), ZoneId::Region(Tz::Europe__Warsaw));
        assert_eq!(
            ZoneId::of("Mars/Olympus_Mons"),
            Err(TimeError::UnknownZone("Mars/Olympus_Mons".into()))
        );
        assert!(ZoneId::of("+25:00").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(ZoneId::UTC.to_string(), "Z");
        assert_eq!(ZoneId::Fixed(offset(-3)).name(), "-03:00");
        assert_eq!(ZoneId::of("America/New_York").unwrap().to_string(), "America/New_York");
        let custom = ZoneId::custom(TransitionTable::fixed("Test/Flat", offset(4)));
        assert_eq!(custom.name(), "Test/Flat");
        assert!(!custom.is_fixed_offset());
    }

    #[test]
    fn test_fixed_zone_is_always_normal() {
        let zone = ZoneId::of("+01:00").unwrap();
        assert_eq!(
            zone.local_offsets(&civil("2021-03-28T02:30")),
            LocalOffsets::Normal(offset(1))
        );
        assert_eq!(zone.offset_at(Instant::MAX), offset(1));
    }

    #[test]
    fn test_warsaw_rules() {
        let warsaw = ZoneId::of("Europe/Warsaw").unwrap();
        assert_eq!(
            warsaw.offset_at(Instant::parse("2021-07-01T00:00:00Z").unwrap()),
            offset(2)
        );
        assert_eq!(
            warsaw.offset_at(Instant::parse("2021-01-01T00:00:00Z").unwrap()),
            offset(1)
        );
        assert_eq!(
            warsaw.local_offsets(&civil("2021-10-31T02:30")),
            LocalOffsets::Overlap {
                earlier: offset(2),
                later: offset(1)
            }
        );
        assert_eq!(
            warsaw.local_offsets(&civil("2021-03-28T02:30")),
            LocalOffsets::Gap {
                before: offset(1),
                after: offset(2)
            }
        );
    }

    #[test]
    fn test_southern_hemisphere_overlap() {
        // Sydney falls back from +11:00 to +10:00 on 2021-04-04 at 03:00.
        let sydney = ZoneId::of("Australia/Sydney").unwrap();
        assert_eq!(
            sydney.local_offsets(&civil("2021-04-04T02:30")),
            LocalOffsets::Overlap {
                earlier: offset(11),
                later: offset(10)
            }
        );
    }

    #[test]
    fn test_zone_db() {
        let db = ZoneDb::global();
        assert!(db.len() > 300);
        assert!(!db.is_empty());
        assert!(db.contains("Europe/Warsaw"));
        assert!(!db.contains("europe/warsaw"));
        let names: Vec<_> = db.names().take(2).collect();
        assert!(names[0] < names[1]);
        assert!(std::ptr::eq(db, ZoneDb::global()));
    }

    #[test]
    fn test_custom_zone_name_does_not_parse_back() {
        let zone = ZoneId::custom(TransitionTable::fixed("Test/Local", UtcOffset::UTC));
        assert_eq!(zone.to_string(), "Test/Local");
        assert_eq!(
            "Test/Local".parse::<ZoneId>(),
            Err(TimeError::UnknownZone("Test/Local".into()))
        );
    }

}
