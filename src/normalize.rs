//! Flattening of raw daily records
//!
//! Raw provider records nest every value behind optional sections. The
//! normalizer resolves those lookups once, producing a flat view where each
//! leaf is either a number or an explicit `None`. A present zero stays zero.
//! Zone durations that are unknown, null or negative are dropped.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{DailyRecord, Workout};
use crate::zones::{millis_to_minutes, ZoneId};

/// Daily record with every optional field resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDay {
    pub date: NaiveDate,
    pub recovery_score: Option<f64>,
    pub sleep_minutes: Option<f64>,
    pub sleep_efficiency: Option<f64>,
    pub light_sleep_minutes: Option<f64>,
    pub deep_sleep_minutes: Option<f64>,
    pub rem_sleep_minutes: Option<f64>,
    pub awake_minutes: Option<f64>,
    pub disturbance_count: Option<f64>,
    pub sleep_cycle_count: Option<f64>,
    pub day_strain: Option<f64>,
    pub workouts: Vec<NormalizedWorkout>,
}

/// Workout with zone durations keyed by known zone ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWorkout {
    pub sport: Option<String>,
    pub duration_minutes: Option<f64>,
    pub strain: Option<f64>,
    pub average_hr: Option<f64>,
    pub max_hr: Option<f64>,
    /// Milliseconds per zone, registry order
    pub zone_millis: BTreeMap<ZoneId, f64>,
}

impl NormalizedDay {
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    pub fn has_workouts(&self) -> bool {
        !self.workouts.is_empty()
    }
}

impl NormalizedWorkout {
    /// Minutes per zone, registry order, unrounded
    pub fn zone_minutes(&self) -> impl Iterator<Item = (ZoneId, f64)> + '_ {
        self.zone_millis
            .iter()
            .map(|(zone, millis)| (*zone, millis_to_minutes(*millis)))
    }

    /// Sum of all zone minutes for this workout
    pub fn total_zone_minutes(&self) -> f64 {
        self.zone_minutes().map(|(_, minutes)| minutes).sum()
    }

    /// Sport label for display
    pub fn sport_label(&self) -> &str {
        self.sport.as_deref().unwrap_or("Unknown")
    }
}

/// Value used when an absent field takes part in a sum
pub fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Single-pass normalizer for raw daily records
pub struct DailyRecordNormalizer;

impl DailyRecordNormalizer {
    pub fn normalize(record: &DailyRecord) -> NormalizedDay {
        let sleep = record.sleep_data.as_ref();
        let metrics = sleep.and_then(|s| s.metrics.as_ref());
        let strain = record.strain_data.as_ref();

        let workouts = strain
            .and_then(|s| s.workouts.as_ref())
            .map(|workouts| {
                workouts
                    .iter()
                    .map(|workout| Self::normalize_workout(record.date, workout))
                    .collect()
            })
            .unwrap_or_default();

        NormalizedDay {
            date: record.date,
            recovery_score: record.recovery_score,
            sleep_minutes: sleep.and_then(|s| s.duration),
            sleep_efficiency: metrics.and_then(|m| m.efficiency_percentage),
            light_sleep_minutes: metrics.and_then(|m| m.light_sleep_time),
            deep_sleep_minutes: metrics.and_then(|m| m.slow_wave_sleep_time),
            rem_sleep_minutes: metrics.and_then(|m| m.rem_sleep_time),
            awake_minutes: metrics.and_then(|m| m.awake_time),
            disturbance_count: metrics.and_then(|m| m.disturbance_count),
            sleep_cycle_count: metrics.and_then(|m| m.sleep_cycle_count),
            day_strain: strain.and_then(|s| s.day_strain),
            workouts,
        }
    }

    /// Normalize a sequence of records, preserving order
    pub fn normalize_all(records: &[DailyRecord]) -> Vec<NormalizedDay> {
        records.iter().map(Self::normalize).collect()
    }

    fn normalize_workout(date: NaiveDate, workout: &Workout) -> NormalizedWorkout {
        let mut zone_millis = BTreeMap::new();

        if let Some(zones) = &workout.zone_duration {
            for (key, millis) in zones {
                match (ZoneId::from_key(key), millis) {
                    (Some(zone), Some(millis)) if *millis >= 0.0 => {
                        zone_millis.insert(zone, *millis);
                    }
                    (Some(_), Some(millis)) => {
                        debug!(%date, zone = %key, millis, "dropping negative zone duration");
                    }
                    (None, _) => {
                        debug!(%date, zone = %key, "dropping unknown heart rate zone");
                    }
                    (Some(_), None) => {}
                }
            }
        }

        NormalizedWorkout {
            sport: workout.sport.clone(),
            duration_minutes: workout.duration,
            strain: workout.strain,
            average_hr: workout.average_hr,
            max_hr: workout.max_hr,
            zone_millis,
        }
    }
}
