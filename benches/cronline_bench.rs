use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use cronline::{parser::CronParser, Schedule};

fn parse_take_100(strict: bool) {
    let parser = CronParser::builder().dom_and_dow(strict).build();
    let schedule = Schedule::with_parser("15 15 13 * fri", &parser, Utc)
        .expect("Couldn't parse cron string");
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for _time in schedule.iter_after(&time).take(100) {}
}

fn previous_100(line: &str) {
    let schedule = Schedule::new(line, Utc).expect("Couldn't parse cron string");
    let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    black_box(schedule.previous_n(&time, 100).expect("No occurrences"));
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse_take_100", |b| {
        b.iter(|| parse_take_100(black_box(false)))
    });
    c.bench_function("parse_take_100_strict", |b| {
        b.iter(|| parse_take_100(black_box(true)))
    });
    c.bench_function("previous_100_leap_day", |b| {
        b.iter(|| previous_100(black_box("0 0 29 2 *")))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
