use chrono::{Duration, NaiveDate};
use healthweek::{
    ChartProjector, DailyRecord, DailyRecordNormalizer, FixedClock, JsonFileSource, RecordSource,
    WeeklyAggregator, WeeklyView, WindowNavigator, ZoneId,
};

/// Integration tests that run complete weekly workflows

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// One provider record with a single 40 minute workout
    fn record_json(day: NaiveDate) -> serde_json::Value {
        serde_json::json!({
            "date": day.format("%Y-%m-%d").to_string(),
            "recovery_score": 50,
            "sleep_data": {
                "duration": 420,
                "metrics": { "efficiency_percentage": 90 }
            },
            "strain_data": {
                "day_strain": 10,
                "workouts": [{
                    "sport": "Running",
                    "duration": 40,
                    "strain": 9.5,
                    "zone_duration": {
                        "zone_two_milli": 600000,
                        "zone_three_milli": 1800000
                    }
                }]
            }
        })
    }

    fn week_records(start: NaiveDate) -> Vec<DailyRecord> {
        (0..7)
            .rev()
            .map(|offset| {
                serde_json::from_value(record_json(start + Duration::days(offset))).unwrap()
            })
            .collect()
    }

    /// Week of 2024-05-01..07 with identical days
    #[test]
    fn test_reference_week() {
        let records = week_records(date(2024, 5, 1));
        let days = DailyRecordNormalizer::normalize_all(&records);

        let summary = WeeklyAggregator::aggregate(&days).unwrap();
        assert!((summary.average_strain - 10.0).abs() < 1e-9);
        assert!((summary.average_recovery - 50.0).abs() < 1e-9);
        assert_eq!(summary.workout_count, 7);
        assert!((summary.total_workout_minutes - 280.0).abs() < 1e-9);
        assert!((summary.total_sleep_minutes - 2940.0).abs() < 1e-9);

        // Weekly zones accumulate across all seven workouts
        assert_eq!(summary.zone_minutes.len(), 2);
        assert!((summary.zone_minutes[&ZoneId::Zone2] - 70.0).abs() < 1e-9);
        assert!((summary.zone_minutes[&ZoneId::Zone3] - 210.0).abs() < 1e-9);

        let bars = ChartProjector::project_workout_zones(&days[0].workouts[0]);
        assert_eq!(bars.len(), 2);
        assert!((bars[0].minutes - 10.0).abs() < 1e-9);
        assert!((bars[1].minutes - 30.0).abs() < 1e-9);
        assert!((bars[0].share_of_workout - 0.25).abs() < 1e-9);
        assert!((bars[1].share_of_workout - 0.75).abs() < 1e-9);

        let series = ChartProjector::project_series(&days);
        let labels: Vec<u32> = series.iter().map(|p| p.day_of_month).collect();
        assert_eq!(labels, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_empty_window_is_loading_state() {
        let navigator = WindowNavigator::new(FixedClock(date(2024, 5, 7)));
        let err = WeeklyView::build(&[], &navigator).unwrap_err();
        assert!(err.is_loading_state());
        assert_eq!(err.user_message(), "Loading health data...");
    }

    #[test]
    fn test_latest_window_cannot_move_forward() {
        let today = date(2024, 5, 7);
        let mut navigator = WindowNavigator::new(FixedClock(today));
        assert_eq!(navigator.anchor(), date(2024, 5, 1));

        assert!(!navigator.move_forward());
        assert_eq!(navigator.anchor(), date(2024, 5, 1));

        let view = WeeklyView::build(&week_records(date(2024, 5, 1)), &navigator).unwrap();
        assert!(!view.forward_permitted);
        assert_eq!(view.range.label, "May 1, 2024 - May 7, 2024");
    }

    #[test]
    fn test_file_source_to_view() {
        let mut all: Vec<serde_json::Value> = Vec::new();
        for offset in 0..14 {
            all.push(record_json(date(2024, 4, 24) + Duration::days(offset)));
        }

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::Value::Array(all)).unwrap();
        let source = JsonFileSource::new(file.path());

        let mut navigator = WindowNavigator::new(FixedClock(date(2024, 5, 7)));
        navigator.move_backward();

        let requested = navigator.anchor();
        let records = source.fetch_window(requested).unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0].date, date(2024, 4, 30));
        assert!(navigator.is_current(requested));

        let view = WeeklyView::build(&records, &navigator).unwrap();
        assert!(view.forward_permitted);
        assert_eq!(view.range.label, "Apr 24, 2024 - Apr 30, 2024");
        assert_eq!(view.series.first().map(|p| p.day_of_month), Some(24));
        assert_eq!(view.days.first().map(|c| c.day.date), Some(date(2024, 4, 30)));
    }

    #[test]
    fn test_partial_records_render() {
        let records: Vec<DailyRecord> = serde_json::from_str(
            r#"[
                {"date": "2024-05-07", "recovery_score": null, "strain_data": {"day_strain": 6}},
                {"date": "2024-05-06", "sleep_data": {"duration": 400}},
                {"date": "2024-05-05", "strain_data": {"workouts": [{"zone_duration": {"zone_nine_milli": 1000}}]}}
            ]"#,
        )
        .unwrap();

        let navigator = WindowNavigator::new(FixedClock(date(2024, 5, 7)));
        let view = WeeklyView::build(&records, &navigator).unwrap();

        assert!((view.summary.average_strain - 2.0).abs() < 1e-9);
        assert_eq!(view.summary.average_recovery, 0.0);
        assert_eq!(view.summary.workout_count, 1);
        assert!(view.zone_distribution.is_empty());
        assert_eq!(view.series[0].recovery, None);
        assert!(view.days[2].workouts[0].zones.is_empty());
    }
}
