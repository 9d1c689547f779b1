//! Weekly summary aggregation
//!
//! Folds one window of normalized days into totals, averages and a
//! heart-rate-zone histogram. Absent values count as zero in every sum, and
//! averages divide by the number of days in the window, including days with
//! no data for that metric.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::AggregationError;
use crate::normalize::{or_zero, NormalizedDay};
use crate::zones::{ZoneId, ZoneMinutes};

/// Aggregate statistics for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub total_sleep_minutes: f64,
    pub average_recovery: f64,
    pub average_strain: f64,
    pub total_workout_minutes: f64,
    pub workout_count: usize,
    /// Minutes per zone; only zones with positive minutes are present
    pub zone_minutes: BTreeMap<ZoneId, f64>,
    /// Number of days folded into the summary
    pub day_count: usize,
}

impl WeeklySummary {
    /// Weekly zone distribution in registry order
    pub fn zone_distribution(&self) -> Vec<ZoneMinutes> {
        self.zone_minutes
            .iter()
            .map(|(zone, minutes)| ZoneMinutes::new(*zone, *minutes))
            .collect()
    }

    pub fn rounded_sleep_minutes(&self) -> i64 {
        self.total_sleep_minutes.round() as i64
    }

    pub fn rounded_sleep_hours(&self) -> i64 {
        (self.total_sleep_minutes / 60.0).round() as i64
    }

    pub fn rounded_workout_minutes(&self) -> i64 {
        self.total_workout_minutes.round() as i64
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    sleep_minutes: f64,
    recovery_sum: f64,
    strain_sum: f64,
    workout_minutes: f64,
    workout_count: usize,
    zone_minutes: BTreeMap<ZoneId, f64>,
}

impl Accumulator {
    fn add_day(&mut self, day: &NormalizedDay) {
        self.sleep_minutes += or_zero(day.sleep_minutes);
        self.recovery_sum += or_zero(day.recovery_score);
        self.strain_sum += or_zero(day.day_strain);

        for workout in &day.workouts {
            self.workout_minutes += or_zero(workout.duration_minutes);
            self.workout_count += 1;

            for (zone, minutes) in workout.zone_minutes() {
                *self.zone_minutes.entry(zone).or_insert(0.0) += minutes;
            }
        }
    }
}

/// Weekly summary calculator
pub struct WeeklyAggregator;

impl WeeklyAggregator {
    /// Fold a window of normalized days into a [`WeeklySummary`]
    ///
    /// An empty window is a precondition violation and yields
    /// [`AggregationError::EmptyWindow`] rather than NaN averages.
    pub fn aggregate(days: &[NormalizedDay]) -> Result<WeeklySummary, AggregationError> {
        if days.is_empty() {
            warn!("weekly aggregation requested for an empty window");
            return Err(AggregationError::EmptyWindow { start: None });
        }

        let mut acc = Accumulator::default();
        for day in days {
            acc.add_day(day);
        }

        let day_count = days.len();
        let divisor = day_count as f64;
        let zone_minutes: BTreeMap<ZoneId, f64> = acc
            .zone_minutes
            .into_iter()
            .filter(|(_, minutes)| *minutes > 0.0)
            .collect();

        debug!(
            days = day_count,
            workouts = acc.workout_count,
            zones = zone_minutes.len(),
            "aggregated weekly summary"
        );

        Ok(WeeklySummary {
            total_sleep_minutes: acc.sleep_minutes,
            average_recovery: acc.recovery_sum / divisor,
            average_strain: acc.strain_sum / divisor,
            total_workout_minutes: acc.workout_minutes,
            workout_count: acc.workout_count,
            zone_minutes,
            day_count,
        })
    }
}
