//! Display-ready weekly view
//!
//! Composes every derivation for one window into a single serializable value
//! that a renderer can consume without further computation.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::charts::{ChartProjector, SeriesPoint, WorkoutZoneBar};
use crate::error::{AggregationError, Result};
use crate::models::DailyRecord;
use crate::normalize::{DailyRecordNormalizer, NormalizedDay, NormalizedWorkout};
use crate::weekly::{WeeklyAggregator, WeeklySummary};
use crate::window::{Clock, DateWindow, WindowNavigator};
use crate::zones::ZoneMinutes;

/// Text shown while the current window has no records
pub const LOADING_PLACEHOLDER: &str = "Loading health data...";

/// One workout on a daily card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutCard {
    pub workout: NormalizedWorkout,
    pub zones: Vec<WorkoutZoneBar>,
}

/// One day of the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCard {
    pub day: NormalizedDay,
    pub workouts: Vec<WorkoutCard>,
}

impl DayCard {
    fn from_day(day: NormalizedDay) -> Self {
        let workouts = day
            .workouts
            .iter()
            .map(|workout| WorkoutCard {
                workout: workout.clone(),
                zones: ChartProjector::project_workout_zones(workout),
            })
            .collect();

        DayCard { day, workouts }
    }
}

/// Everything the dashboard shows for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyView {
    pub range: DateWindow,
    /// Whether navigating to the next window is allowed
    pub forward_permitted: bool,
    pub summary: WeeklySummary,
    pub zone_distribution: Vec<ZoneMinutes>,
    /// Chronological, oldest first
    pub series: Vec<SeriesPoint>,
    /// Provider order, newest first
    pub days: Vec<DayCard>,
}

impl WeeklyView {
    /// Build the view for the navigator's current window
    ///
    /// `records` are the newest-first records fetched for that window. An
    /// empty slice means the window has not loaded yet.
    pub fn build<C: Clock>(records: &[DailyRecord], navigator: &WindowNavigator<C>) -> Result<Self> {
        let range = navigator.current_range();

        let days = DailyRecordNormalizer::normalize_all(records);
        let summary = WeeklyAggregator::aggregate(&days).map_err(|err| match err {
            AggregationError::EmptyWindow { .. } => AggregationError::EmptyWindow {
                start: Some(range.start),
            },
        })?;

        let zone_distribution = summary.zone_distribution();
        let series = ChartProjector::project_series(&days);
        let days: Vec<DayCard> = days.into_iter().map(DayCard::from_day).collect();

        info!(
            window = %range.label,
            days = days.len(),
            workouts = summary.workout_count,
            "built weekly view"
        );

        Ok(WeeklyView {
            forward_permitted: navigator.can_move_forward(),
            range,
            summary,
            zone_distribution,
            series,
            days,
        })
    }

    pub fn loading_placeholder() -> &'static str {
        LOADING_PLACEHOLDER
    }

    /// Serialize for an external renderer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StrainData, Workout};
    use crate::window::FixedClock;
    use crate::zones::ZoneId;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn record(d: u32) -> DailyRecord {
        let mut zones = BTreeMap::new();
        zones.insert("zone_two_milli".to_string(), Some(600_000.0));
        zones.insert("zone_three_milli".to_string(), Some(1_800_000.0));

        DailyRecord {
            date: date(d),
            recovery_score: Some(50.0),
            sleep_data: None,
            strain_data: Some(StrainData {
                day_strain: Some(10.0),
                workouts: Some(vec![Workout {
                    sport: Some("Running".to_string()),
                    duration: Some(40.0),
                    strain: Some(9.0),
                    average_hr: None,
                    max_hr: None,
                    zone_duration: Some(zones),
                }]),
            }),
        }
    }

    #[test]
    fn test_build_view() {
        let navigator = WindowNavigator::new(FixedClock(date(7)));
        let records: Vec<DailyRecord> = (1..=7).rev().map(record).collect();

        let view = WeeklyView::build(&records, &navigator).unwrap();
        assert_eq!(view.range.label, "May 1, 2024 - May 7, 2024");
        assert!(!view.forward_permitted);
        assert_eq!(view.summary.workout_count, 7);

        let zones: Vec<ZoneId> = view.zone_distribution.iter().map(|z| z.zone).collect();
        assert_eq!(zones, vec![ZoneId::Zone2, ZoneId::Zone3]);

        assert_eq!(view.series.first().map(|p| p.day_of_month), Some(1));
        assert_eq!(view.days.first().map(|c| c.day.date), Some(date(7)));
        assert_eq!(view.days[0].workouts[0].zones.len(), 2);
    }

    #[test]
    fn test_forward_flag_on_past_window() {
        let mut navigator = WindowNavigator::new(FixedClock(date(14)));
        navigator.move_backward();
        let records: Vec<DailyRecord> = (1..=7).rev().map(record).collect();

        let view = WeeklyView::build(&records, &navigator).unwrap();
        assert!(view.forward_permitted);
    }

    #[test]
    fn test_empty_records_carry_window_start() {
        let navigator = WindowNavigator::new(FixedClock(date(7)));
        let err = WeeklyView::build(&[], &navigator).unwrap_err();

        assert!(err.is_loading_state());
        assert_eq!(err.user_message(), WeeklyView::loading_placeholder());
        assert!(err.to_string().contains("2024-05-01"));
    }

    #[test]
    fn test_view_serializes() {
        let navigator = WindowNavigator::new(FixedClock(date(7)));
        let view = WeeklyView::build(&[record(7)], &navigator).unwrap();

        let json = view.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["forward_permitted"], serde_json::Value::Bool(false));
        assert_eq!(value["range"]["start"], "2024-05-01");
        assert_eq!(value["zone_distribution"][0]["color"], "#7289da");
    }
}
