//! Chart projections
//!
//! Records arrive newest-first from the provider. Every series produced here
//! is chronological (oldest first).

use serde::{Deserialize, Serialize};

use crate::normalize::{NormalizedDay, NormalizedWorkout};
use crate::zones::ZoneId;

/// One day on the time-series charts
///
/// `day_of_month` is an axis label only. It is not unique across a month
/// boundary; ordering is carried by the position in the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub day_of_month: u32,
    pub recovery: Option<f64>,
    pub sleep_minutes: Option<f64>,
    pub strain: Option<f64>,
    pub sleep_efficiency: Option<f64>,
}

/// One bar of a workout's heart rate zone breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutZoneBar {
    pub zone: ZoneId,
    pub label: String,
    pub minutes: f64,
    pub color: String,
    /// Fraction of the workout's total zone time (0.0 - 1.0)
    pub share_of_workout: f64,
}

impl WorkoutZoneBar {
    /// Bar width as a percentage for rendering
    pub fn percent_of_workout(&self) -> f64 {
        self.share_of_workout * 100.0
    }
}

pub struct ChartProjector;

impl ChartProjector {
    /// Project newest-first days into a chronological series
    pub fn project_series(days: &[NormalizedDay]) -> Vec<SeriesPoint> {
        days.iter()
            .rev()
            .map(|day| SeriesPoint {
                day_of_month: day.day_of_month(),
                recovery: day.recovery_score,
                sleep_minutes: day.sleep_minutes,
                strain: day.day_strain,
                sleep_efficiency: day.sleep_efficiency,
            })
            .collect()
    }

    /// Zone bars for one workout, registry order, zero-minute zones omitted
    ///
    /// Shares are 0.0 for every zone when the workout has no zone time.
    pub fn project_workout_zones(workout: &NormalizedWorkout) -> Vec<WorkoutZoneBar> {
        let total = workout.total_zone_minutes();

        workout
            .zone_minutes()
            .filter(|(_, minutes)| *minutes > 0.0)
            .map(|(zone, minutes)| {
                let definition = zone.definition();
                WorkoutZoneBar {
                    zone,
                    label: definition.label.to_string(),
                    minutes,
                    color: definition.color.to_string(),
                    share_of_workout: if total > 0.0 { minutes / total } else { 0.0 },
                }
            })
            .collect()
    }
}
