use std::hint::black_box;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, Criterion};
use schedule_engine::{
    expand_occurrences, normalize, parse_schedule, synthesize, DateTimeResolver, DstPolicy,
    EngineConfig, FixedClock, WeekdaySet,
};

const SCHEDULE: &str = "\
CS 101 - Intro&nbsp;to&nbsp;Programming\r
MWF 10:00 - 10:50 AM KEMPER 2110\r
Final Exam: Mon. Dec.15 at 8:00am\r
ECS 036A - Software Development\r
TR 1:40 - 3:00 PM WELLMAN 2\r
F 11:00 - 11:50 AM OLSON 118\r
Final Exam: Thu. Dec.11 at 10:30am\r
STA 013 - Statistics\r
MW 11:00 - 12:15 PM HUNT 100\r
Final Exam: Wed. Dec.10 at 6:00pm\r
";

fn bench_parse(c: &mut Criterion) {
    let config = EngineConfig::default().with_reference_year(2025);
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 9, 24, 18, 0, 0).unwrap());

    c.bench_function("normalize", |b| b.iter(|| normalize(black_box(SCHEDULE))));
    c.bench_function("parse_schedule/3_courses", |b| {
        b.iter(|| parse_schedule(black_box(SCHEDULE), &config, &clock).unwrap())
    });
}

fn bench_recurrence(c: &mut Criterion) {
    let mwf = WeekdaySet::from_letters("MWF").unwrap();
    let anchor = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
    c.bench_function("synthesize", |b| {
        b.iter(|| synthesize(black_box(mwf), black_box(anchor)).unwrap())
    });

    let resolver = DateTimeResolver::new(
        Tz::America__Los_Angeles,
        DstPolicy::default(),
        Utc.with_ymd_and_hms(2025, 9, 24, 18, 0, 0).unwrap(),
        Some(2025),
    );
    let first = resolver
        .localize(
            NaiveDate::from_ymd_opt(2025, 9, 24)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
        .unwrap();
    let rule = synthesize(mwf, anchor).unwrap();
    c.bench_function("expand_occurrences/semester", |b| {
        b.iter(|| expand_occurrences(black_box(&rule), first, Duration::minutes(50)).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_recurrence);
criterion_main!(benches);
