use tempozone::{CivilDateTime, DateRange, Duration, Instant, Period, ZoneId, ZonedDateTime};

fn main() -> Result<(), tempozone::TimeError> {
    let warsaw = ZoneId::of("Europe/Warsaw")?;

    let now = Instant::now();
    println!("now: {now}");
    println!("now in Warsaw: {}", now.at_zone(warsaw.clone()));

    let noon: CivilDateTime = "2021-03-27T12:00:00".parse()?;
    let start = ZonedDateTime::of(noon, warsaw.clone());
    println!("start: {start}");
    println!("+ 1 day exact: {}", start.plus_duration(Duration::of_days(1))?);
    println!("+ 1 day on the calendar: {}", start.plus_period(&Period::of_days(1))?);

    let skipped: CivilDateTime = "2021-03-28T02:30:00".parse()?;
    println!("gap resolves to: {}", ZonedDateTime::of(skipped, warsaw.clone()));

    let repeated = ZonedDateTime::of("2021-10-31T02:30:00".parse()?, warsaw.clone());
    println!("overlap earlier: {}", repeated.with_earlier_offset_at_overlap());
    println!("overlap later: {}", repeated.with_later_offset_at_overlap());

    let term: DateRange = "2021-01-06..=2021-07-23".parse()?;
    let span = term.to_interval(&warsaw)?;
    println!("{term}: {} days, {}", term.length_in_days(), span.duration());

    Ok(())
}
