// benches/aggregate.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use paddock::{
    csv::{Delim, parse_table},
    race::Series,
    runner::build_features,
    timing::parse_time_to_seconds,
};

/// Synthetic F2-style sheet: `seasons` x 12 rounds x 2 sessions x 22 drivers.
fn synthetic_f2(seasons: i64) -> String {
    let mut out = String::from(
        "season,race_id,session,laps,race_time,best_lap_time,gap,status,driver_name,driver_code,team_name,kph\n",
    );
    for season in 2018..2018 + seasons {
        for round in 0..12 {
            for session in ["Sprint", "Feature"] {
                for d in 0..22u32 {
                    let secs = 2400 + d * 3 + round;
                    let (min, sec, ms) = (secs / 60, secs % 60, d * 7);
                    let best = 100 + d % 10;
                    let gap = d * 3;
                    let status = if (d + round) % 17 == 0 { "DNF" } else { "" };
                    let (team, kph) = (d / 2, 180 + d);
                    out.push_str(&format!(
                        "{season},r{round},{session},30,{min}:{sec:02}.{ms:03},{best}.{ms:03},+{gap}.{ms:03},{status},Driver {d},D{d:02},Team {team},{kph}\n"
                    ));
                }
            }
        }
    }
    out
}

fn bench_aggregate(c: &mut Criterion) {
    let text = synthetic_f2(5);
    let raw = parse_table(&text, Delim::Csv);

    c.bench_function("parse_table_f2", |b| {
        b.iter(|| black_box(parse_table(black_box(&text), Delim::Csv).len()))
    });

    c.bench_function("build_features_f2", |b| {
        b.iter(|| {
            let (table, _) = build_features(Series::F2, black_box(&raw)).expect("features");
            black_box(table.len())
        })
    });

    c.bench_function("parse_time", |b| {
        b.iter(|| black_box(parse_time_to_seconds(black_box("1:02:03.456"))))
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
