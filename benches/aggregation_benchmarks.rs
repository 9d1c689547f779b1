use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeMap;
use healthweek::{
    ChartProjector, DailyRecord, DailyRecordNormalizer, FixedClock, InsightSettings, SleepData,
    StrainData, WeeklyAggregator, WeeklyInsights, WeeklyView, WindowNavigator, Workout,
};

/// Benchmarks for the weekly derivations
///
/// A window is seven days, so these mostly guard against regressions in the
/// per-record cost; larger inputs exercise the insight statistics.

fn create_records(days: usize, workouts_per_day: usize) -> Vec<DailyRecord> {
    let end = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();

    (0..days)
        .map(|offset| {
            let workouts = (0..workouts_per_day)
                .map(|i| {
                    let mut zones = BTreeMap::new();
                    zones.insert("zone_one_milli".to_string(), Some(300_000.0 * (i + 1) as f64));
                    zones.insert("zone_two_milli".to_string(), Some(600_000.0));
                    zones.insert("zone_four_milli".to_string(), Some(120_000.0));
                    Workout {
                        sport: Some("Cycling".to_string()),
                        duration: Some(45.0),
                        strain: Some(8.0 + i as f64),
                        average_hr: Some(140.0),
                        max_hr: Some(172.0),
                        zone_duration: Some(zones),
                    }
                })
                .collect();

            DailyRecord {
                date: end - Duration::days(offset as i64),
                recovery_score: Some(30.0 + (offset % 60) as f64),
                sleep_data: Some(SleepData {
                    duration: Some(400.0 + (offset % 90) as f64),
                    metrics: None,
                }),
                strain_data: Some(StrainData {
                    day_strain: Some(6.0 + (offset % 12) as f64),
                    workouts: Some(workouts),
                }),
            }
        })
        .collect()
}

fn bench_weekly_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Weekly Aggregation");

    for &workouts in &[0, 2, 8] {
        let records = create_records(7, workouts);
        let days = DailyRecordNormalizer::normalize_all(&records);

        group.throughput(Throughput::Elements(days.len() as u64));
        group.bench_with_input(BenchmarkId::new("aggregate", workouts), &days, |b, days| {
            b.iter(|| WeeklyAggregator::aggregate(black_box(days)))
        });
        group.bench_with_input(BenchmarkId::new("normalize", workouts), &records, |b, records| {
            b.iter(|| DailyRecordNormalizer::normalize_all(black_box(records)))
        });
    }

    group.finish();
}

fn bench_chart_projection(c: &mut Criterion) {
    let records = create_records(7, 4);
    let days = DailyRecordNormalizer::normalize_all(&records);

    c.bench_function("project_series", |b| {
        b.iter(|| ChartProjector::project_series(black_box(&days)))
    });
    c.bench_function("project_workout_zones", |b| {
        b.iter(|| {
            for day in &days {
                for workout in &day.workouts {
                    black_box(ChartProjector::project_workout_zones(workout));
                }
            }
        })
    });
}

fn bench_weekly_view(c: &mut Criterion) {
    let records = create_records(7, 3);
    let navigator = WindowNavigator::new(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 7).unwrap()));

    c.bench_function("build_weekly_view", |b| {
        b.iter(|| WeeklyView::build(black_box(&records), &navigator))
    });
}

fn bench_insights(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insights");
    let settings = InsightSettings::default();

    for &size in &[7, 30, 365] {
        let days = DailyRecordNormalizer::normalize_all(&create_records(size, 1));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("analyze", size), &days, |b, days| {
            b.iter(|| WeeklyInsights::analyze(black_box(days), &settings))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_weekly_aggregation,
    bench_chart_projection,
    bench_weekly_view,
    bench_insights
);
criterion_main!(benches);
