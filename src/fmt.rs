// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! ISO-8601 text: a small byte cursor for parsing and the shared writers.
//!
//! Accepted grammar:
//!
//! ```text
//! datetime := date ('T' | 't' | ' ') time
//! date     := year '-' MM '-' DD
//! year     := DDDD | ('+' | '-') DDDD[D[D]]
//! time     := HH ':' mm [':' ss ['.' fraction{1,9}]]
//! offset   := 'Z' | 'z' | ('+' | '-') HH [[':'] MM [[':'] SS]]
//! zone     := '[' name ']'
//! ```

use std::fmt;

use tracing::debug;

use crate::error::{TimeError, TimeResult};
use crate::{CivilDate, CivilDateTime, CivilTime, UtcOffset, ZoneId, ZoneRules, ZonedDateTime};

// ═══════════════════════════════════════════════════════════════════════════
// Cursor
// ═══════════════════════════════════════════════════════════════════════════

pub(crate) struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn error(&self, reason: &'static str) -> TimeError {
        TimeError::format(self.input, reason)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> TimeResult<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    fn digit_run(&self) -> usize {
        self.bytes[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    }

    /// Exactly `n` ASCII digits.
    fn digits(&mut self, n: usize, reason: &'static str) -> TimeResult<u32> {
        let end = self.pos + n;
        if end > self.bytes.len() || !self.bytes[self.pos..end].iter().all(u8::is_ascii_digit) {
            return Err(self.error(reason));
        }
        let value = self.bytes[self.pos..end]
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        self.pos = end;
        Ok(value)
    }

    fn year(&mut self) -> TimeResult<i32> {
        let sign = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(self.digits(4, "expected four-digit year")? as i32),
        };
        self.pos += 1;
        let run = self.digit_run();
        if !(4..=6).contains(&run) {
            return Err(self.error("signed year needs four to six digits"));
        }
        let year = self.digits(run, "expected year")? as i32;
        if sign < 0 && year == 0 {
            return Err(self.error("year -0000 is not allowed"));
        }
        Ok(sign * year)
    }

    pub(crate) fn date(&mut self) -> TimeResult<CivilDate> {
        let year = self.year()?;
        self.expect(b'-', "expected '-' after year")?;
        let month = self.digits(2, "expected two-digit month")?;
        self.expect(b'-', "expected '-' after month")?;
        let day = self.digits(2, "expected two-digit day")?;
        CivilDate::of(year, month, day)
    }

    pub(crate) fn time(&mut self) -> TimeResult<CivilTime> {
        let hour = self.digits(2, "expected two-digit hour")?;
        self.expect(b':', "expected ':' after hour")?;
        let minute = self.digits(2, "expected two-digit minute")?;
        let mut second = 0;
        let mut nano = 0;
        if self.eat(b':') {
            second = self.digits(2, "expected two-digit second")?;
            if self.eat(b'.') {
                let run = self.digit_run();
                if !(1..=9).contains(&run) {
                    return Err(self.error("fraction needs one to nine digits"));
                }
                nano = self.digits(run, "expected fraction")? * 10u32.pow((9 - run) as u32);
            }
        }
        CivilTime::of(hour, minute, second, nano)
    }

    pub(crate) fn datetime(&mut self) -> TimeResult<CivilDateTime> {
        let date = self.date()?;
        if !(self.eat(b'T') || self.eat(b't') || self.eat(b' ')) {
            return Err(self.error("expected 'T' between date and time"));
        }
        let time = self.time()?;
        Ok(date.at(time))
    }

    /// An offset if one starts here; `None` leaves the cursor untouched.
    pub(crate) fn offset(&mut self) -> TimeResult<Option<UtcOffset>> {
        let sign = match self.peek() {
            Some(b'Z' | b'z') => {
                self.pos += 1;
                return Ok(Some(UtcOffset::UTC));
            }
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(None),
        };
        self.pos += 1;
        let hours = self.digits(2, "expected two-digit offset hours")? as i32;
        let mut minutes = 0;
        let mut seconds = 0;
        let colon = self.eat(b':');
        if colon || self.digit_run() >= 2 {
            minutes = self.digits(2, "expected two-digit offset minutes")? as i32;
            let has_seconds = if colon {
                self.eat(b':')
            } else {
                self.digit_run() >= 2
            };
            if has_seconds {
                seconds = self.digits(2, "expected two-digit offset seconds")? as i32;
            }
        }
        if minutes > 59 || seconds > 59 {
            return Err(self.error("offset field out of range"));
        }
        let total = sign * (hours * 3_600 + minutes * 60 + seconds);
        UtcOffset::from_seconds(total).map(Some)
    }

    /// A bracketed zone name if one starts here.
    pub(crate) fn zone_annotation(&mut self) -> TimeResult<Option<String>> {
        if !self.eat(b'[') {
            return Ok(None);
        }
        let rest = &self.input[self.pos..];
        let len = rest
            .find(']')
            .ok_or_else(|| self.error("unterminated zone annotation"))?;
        if len == 0 {
            return Err(self.error("empty zone annotation"));
        }
        let name = rest[..len].to_owned();
        self.pos += len + 1;
        Ok(Some(name))
    }

    pub(crate) fn finish(&self) -> TimeResult<()> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Writers
// ═══════════════════════════════════════════════════════════════════════════

/// `0000`..`9999` as four digits, anything else with an explicit sign.
pub(crate) fn write_year(f: &mut fmt::Formatter<'_>, year: i32) -> fmt::Result {
    if year > 9_999 {
        write!(f, "+{year}")
    } else if year < 0 {
        write!(f, "-{:04}", year.unsigned_abs())
    } else {
        write!(f, "{year:04}")
    }
}

/// Nothing for zero, otherwise the shortest of 3, 6 or 9 digits.
pub(crate) fn write_fraction(f: &mut fmt::Formatter<'_>, nanos: u32) -> fmt::Result {
    if nanos == 0 {
        Ok(())
    } else if nanos % 1_000_000 == 0 {
        write!(f, ".{:03}", nanos / 1_000_000)
    } else if nanos % 1_000 == 0 {
        write!(f, ".{:06}", nanos / 1_000)
    } else {
        write!(f, ".{nanos:09}")
    }
}

pub(crate) fn write_offset(f: &mut fmt::Formatter<'_>, offset: UtcOffset) -> fmt::Result {
    let total = offset.seconds();
    if total == 0 {
        return f.write_str("Z");
    }
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.unsigned_abs();
    write!(f, "{sign}{:02}:{:02}", abs / 3_600, abs / 60 % 60)?;
    if abs % 60 != 0 {
        write!(f, ":{:02}", abs % 60)?;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Zoned text
// ═══════════════════════════════════════════════════════════════════════════

/// How a parsed `offset[zone]` pair is settled when the zone's rules do not
/// accept the offset for the parsed civil time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum OffsetConflict {
    /// Take the instant from the literal offset and view it in the zone.
    #[default]
    UseOffset,
    /// Keep the offset if the zone allows it, otherwise resolve the civil
    /// time in the zone with the default policy.
    PreferOffset,
    /// Ignore the offset and resolve the civil time in the zone.
    UseZone,
    /// Fail with [`TimeError::OffsetConflict`].
    Reject,
}

/// The pieces of `civil[offset][[zone]]` text before any zone rules are
/// applied.
///
/// Decoding the same text against different rules can denote different
/// instants; keeping the parse separate from the resolution makes that
/// choice explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedZoned {
    civil: CivilDateTime,
    offset: Option<UtcOffset>,
    zone: Option<String>,
}

impl ParsedZoned {
    pub fn parse(text: &str) -> TimeResult<Self> {
        let mut cursor = Cursor::new(text);
        let civil = cursor.datetime()?;
        let offset = cursor.offset()?;
        let zone = cursor.zone_annotation()?;
        cursor.finish()?;
        Ok(Self { civil, offset, zone })
    }

    pub fn civil(&self) -> CivilDateTime {
        self.civil
    }

    pub fn offset(&self) -> Option<UtcOffset> {
        self.offset
    }

    /// The bracketed zone name, if any.
    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Resolve against `zone`, ignoring any zone name in the text.
    pub fn resolve(&self, zone: &ZoneId, conflict: OffsetConflict) -> TimeResult<ZonedDateTime> {
        let offset = match (self.offset, conflict) {
            (Some(offset), policy) if policy != OffsetConflict::UseZone => offset,
            _ => return Ok(ZonedDateTime::of(self.civil, zone.clone())),
        };
        if zone.local_offsets(&self.civil).contains(offset) {
            let instant = self.civil.to_instant(offset)?;
            return Ok(ZonedDateTime::of_instant(instant, zone.clone()));
        }
        debug!(
            civil = %self.civil,
            offset = %offset,
            zone = %zone,
            policy = ?conflict,
            "parsed offset not valid in zone"
        );
        match conflict {
            OffsetConflict::UseOffset => {
                let instant = self.civil.to_instant(offset)?;
                Ok(ZonedDateTime::of_instant(instant, zone.clone()))
            }
            OffsetConflict::PreferOffset | OffsetConflict::UseZone => {
                Ok(ZonedDateTime::of(self.civil, zone.clone()))
            }
            OffsetConflict::Reject => Err(TimeError::OffsetConflict {
                civil: self.civil.to_string(),
                offset: offset.to_string(),
                zone: zone.to_string(),
            }),
        }
    }

    /// Resolve against the zone named in the text, or the literal offset
    /// when no zone is named.
    pub fn into_zoned(&self, conflict: OffsetConflict) -> TimeResult<ZonedDateTime> {
        let zone = match (&self.zone, self.offset) {
            (Some(name), _) => ZoneId::of(name)?,
            (None, Some(offset)) => ZoneId::Fixed(offset),
            (None, None) => {
                return Err(TimeError::format(
                    &self.civil.to_string(),
                    "missing UTC offset or zone",
                ))
            }
        };
        self.resolve(&zone, conflict)
    }
}
