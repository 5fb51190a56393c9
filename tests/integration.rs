use qtty::Days;
use tempozone::{
    complement_within, intersect_intervals, CivilDate, CivilDateTime, Disambiguation, Duration,
    Instant, Interval, OffsetConflict, ParsedZoned, Period, TimeError, Transition,
    TransitionTable, Unit, UtcOffset, ZoneId, ZonedDateTime,
};

fn warsaw() -> ZoneId {
    ZoneId::of("Europe/Warsaw").unwrap()
}

fn civil(text: &str) -> CivilDateTime {
    text.parse().unwrap()
}

fn date(text: &str) -> CivilDate {
    text.parse().unwrap()
}

#[test]
fn zoned_resolution_is_deterministic() {
    for text in [
        "2021-03-28T02:30:00",
        "2021-10-31T02:30:00",
        "2021-06-15T08:45:12.5",
        "1970-01-01T00:00:00",
    ] {
        let c = civil(text);
        let first = ZonedDateTime::of(c, warsaw()).to_instant();
        for _ in 0..8 {
            assert_eq!(ZonedDateTime::of(c, warsaw()).to_instant(), first);
        }
    }
}

#[test]
fn epoch_milli_roundtrip() {
    for ms in [0, 1, -1, 1_616_893_200_000, -62_135_596_800_000, 8_000_000_000_000_000] {
        assert_eq!(Instant::from_epoch_milli(ms).unwrap().to_epoch_milli(), ms);
    }
}

#[test]
fn instant_text_is_stable() {
    for text in [
        "2021-03-28T01:00:00Z",
        "1969-12-31T23:59:59.999Z",
        "2038-01-19T03:14:07.000001Z",
        "2000-02-29T12:00:00.123456789Z",
    ] {
        let instant: Instant = text.parse().unwrap();
        assert_eq!(instant.to_string(), text);
    }
}

#[test]
fn truncation_is_idempotent() {
    let instant: Instant = "2021-10-31T00:30:59.987654321Z".parse().unwrap();
    let once = instant.truncated_to(Unit::Seconds);
    assert_eq!(once.truncated_to(Unit::Seconds), once);
    assert_eq!(once.nano(), 0);
}

#[test]
fn warsaw_overlap_offers_both_instants() {
    let zoned = ZonedDateTime::of(civil("2021-10-31T02:30:00"), warsaw());
    let earlier = zoned.with_earlier_offset_at_overlap();
    let later = zoned.with_later_offset_at_overlap();

    assert_eq!(earlier.offset(), UtcOffset::from_hours(2).unwrap());
    assert_eq!(later.offset(), UtcOffset::from_hours(1).unwrap());
    assert_eq!(earlier.civil(), later.civil());
    assert_eq!(
        earlier.to_instant().duration_until(&later.to_instant()),
        Duration::of_hours(1)
    );
}

#[test]
fn warsaw_gap_shifts_forward() {
    let zoned = ZonedDateTime::of(civil("2021-03-28T02:30:00"), warsaw());
    assert_eq!(zoned.civil(), civil("2021-03-28T03:30:00"));
    assert_eq!(zoned.offset(), UtcOffset::from_hours(2).unwrap());
    assert_eq!(zoned.to_instant().to_string(), "2021-03-28T01:30:00Z");

    assert!(matches!(
        ZonedDateTime::of_with(civil("2021-03-28T02:30:00"), warsaw(), Disambiguation::Reject),
        Err(TimeError::AmbiguousZoneResolution { .. })
    ));
}

#[test]
fn duration_and_period_differ_across_transition() {
    let start = ZonedDateTime::of(civil("2021-03-27T12:00:00"), warsaw());
    assert_eq!(start.offset(), UtcOffset::from_hours(1).unwrap());

    let exact = start.plus_duration(Duration::of_days(1)).unwrap();
    assert_eq!(exact.civil(), civil("2021-03-28T13:00:00"));
    assert_eq!(start.duration_until(&exact), Duration::of_hours(24));

    let calendar = start.plus_period(&Period::of_days(1)).unwrap();
    assert_eq!(calendar.civil(), civil("2021-03-28T12:00:00"));
    assert_eq!(calendar.offset(), UtcOffset::from_hours(2).unwrap());
    assert_eq!(start.duration_until(&calendar), Duration::of_hours(23));
}

#[test]
fn date_range_boundaries() {
    let closed = tempozone::DateRange::of_closed(date("2021-01-06"), date("2021-07-23")).unwrap();
    assert!(closed.contains(&date("2021-07-23")));
    assert!(!closed.contains(&date("2021-07-24")));

    let open = tempozone::DateRange::of(date("2021-01-06"), date("2021-07-23")).unwrap();
    assert!(open.contains(&date("2021-07-22")));
    assert!(!open.contains(&date("2021-07-23")));
    assert_eq!(closed.length_in_days(), open.length_in_days() + 1);
}

#[test]
fn shifted_offset_text_does_not_reproduce_instant() {
    let original = ZonedDateTime::of(civil("2021-06-01T12:00:00"), warsaw());
    let text = original.to_string();
    assert_eq!(text, "2021-06-01T12:00:00+02:00[Europe/Warsaw]");

    let tampered = text.replace("+02:00", "+03:00");
    let decoded: ZonedDateTime = tampered.parse().unwrap();
    assert_ne!(decoded.to_instant(), original.to_instant());
    assert_eq!(
        decoded.to_instant().duration_until(&original.to_instant()),
        Duration::of_hours(1)
    );

    assert!(matches!(
        ZonedDateTime::parse_with(&tampered, OffsetConflict::Reject),
        Err(TimeError::OffsetConflict { .. })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn serde_shifted_offset_does_not_reproduce_instant() {
    let original = ZonedDateTime::of(civil("2021-06-01T12:00:00"), warsaw());
    let json = serde_json::to_string(&original).unwrap();
    assert_eq!(json, r#""2021-06-01T12:00:00+02:00[Europe/Warsaw]""#);

    let back: ZonedDateTime = serde_json::from_str(&json).unwrap();
    assert_eq!(back, original);

    let shifted: ZonedDateTime = serde_json::from_str(&json.replace("+02:00", "+01:00")).unwrap();
    assert_ne!(shifted.to_instant(), original.to_instant());
}

#[test]
fn changed_rules_move_stored_civil_times() {
    let summer_starts: Instant = "2030-03-31T01:00:00Z".parse().unwrap();
    let with_dst = ZoneId::custom(
        TransitionTable::new(
            "Test/Shifting",
            UtcOffset::from_hours(1).unwrap(),
            vec![Transition::new(summer_starts, UtcOffset::from_hours(2).unwrap())],
        )
        .unwrap(),
    );
    let without_dst = ZoneId::custom(TransitionTable::fixed(
        "Test/Shifting",
        UtcOffset::from_hours(1).unwrap(),
    ));

    let meeting = ZonedDateTime::of(civil("2030-06-01T12:00:00"), with_dst);
    let stored = meeting.to_string();
    assert_eq!(stored, "2030-06-01T12:00:00+02:00[Test/Shifting]");

    let parsed = ParsedZoned::parse(&stored).unwrap();
    assert_eq!(parsed.zone_name(), Some("Test/Shifting"));

    // Keeping the instant moves the wall clock.
    let same_instant = parsed.resolve(&without_dst, OffsetConflict::UseOffset).unwrap();
    assert_eq!(same_instant.to_instant(), meeting.to_instant());
    assert_eq!(same_instant.civil(), civil("2030-06-01T11:00:00"));

    // Keeping the wall clock moves the instant.
    let same_local = parsed.resolve(&without_dst, OffsetConflict::PreferOffset).unwrap();
    assert_eq!(same_local.civil(), meeting.civil());
    assert_eq!(
        meeting.to_instant().duration_until(&same_local.to_instant()),
        Duration::of_hours(1)
    );

    assert!(parsed.resolve(&without_dst, OffsetConflict::Reject).is_err());
}

#[test]
fn interval_set_ops_match_expected_spans() {
    let at = |h: i64| Instant::EPOCH.plus(h, Unit::Hours).unwrap();
    let span = |a: i64, b: i64| Interval::new(at(a), at(b)).unwrap();

    let outer = span(0, 10);
    let a = vec![span(1, 3), span(5, 9)];
    let b = vec![span(2, 4), span(7, 8)];

    let outside_b = complement_within(outer, &b);
    let between = intersect_intervals(&a, &outside_b);

    assert_eq!(between, vec![span(1, 2), span(5, 7), span(8, 9)]);
    let total: f64 = between.iter().map(|i| i.duration_days().value()).sum();
    assert!((Days::new(total) - Days::new(4.0 / 24.0)).abs() < Days::new(1e-12));
    assert_eq!(Duration::of_hours(12).as_days(), Days::new(0.5));
}

#[test]
fn date_range_maps_to_instants_in_zone() {
    let range = tempozone::DateRange::of_closed(date("2021-10-30"), date("2021-10-31")).unwrap();
    let interval = range.to_interval(&warsaw()).unwrap();
    assert_eq!(interval.duration(), Duration::of_hours(49));
    assert!(interval.contains(&ZonedDateTime::of(civil("2021-10-31T23:59:59"), warsaw()).to_instant()));
    assert!(!interval.contains(&ZonedDateTime::start_of_day(date("2021-11-01"), warsaw()).to_instant()));
}
