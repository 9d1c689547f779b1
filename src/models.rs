use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw daily health record as returned by the data provider
///
/// One record per calendar day. Every nested section and every numeric leaf
/// may be missing or `null`; consumers go through
/// [`crate::normalize::DailyRecordNormalizer`] instead of reading these
/// fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date of the record
    pub date: NaiveDate,

    /// Recovery score (0-100)
    #[serde(default)]
    pub recovery_score: Option<f64>,

    /// Sleep section
    #[serde(default)]
    pub sleep_data: Option<SleepData>,

    /// Strain section, including the day's workouts
    #[serde(default)]
    pub strain_data: Option<StrainData>,
}

/// Sleep summary for a day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SleepData {
    /// Total sleep duration in minutes
    #[serde(default)]
    pub duration: Option<f64>,

    /// Stage breakdown and quality metrics
    #[serde(default)]
    pub metrics: Option<SleepStageMetrics>,
}

/// Sleep stage breakdown, minutes unless noted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SleepStageMetrics {
    /// Sleep efficiency percentage (0-100)
    #[serde(default)]
    pub efficiency_percentage: Option<f64>,

    #[serde(default)]
    pub light_sleep_time: Option<f64>,

    /// Deep (slow wave) sleep
    #[serde(default)]
    pub slow_wave_sleep_time: Option<f64>,

    #[serde(default)]
    pub rem_sleep_time: Option<f64>,

    #[serde(default)]
    pub awake_time: Option<f64>,

    /// Number of disturbances (count, not minutes)
    #[serde(default)]
    pub disturbance_count: Option<f64>,

    /// Number of completed sleep cycles
    #[serde(default)]
    pub sleep_cycle_count: Option<f64>,
}

/// Strain summary for a day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrainData {
    /// Whole-day strain
    #[serde(default)]
    pub day_strain: Option<f64>,

    /// Workouts in recorded order
    #[serde(default)]
    pub workouts: Option<Vec<Workout>>,
}

/// Single workout as reported by the provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workout {
    /// Sport label (e.g. "Running")
    #[serde(default)]
    pub sport: Option<String>,

    /// Duration in minutes
    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(default)]
    pub strain: Option<f64>,

    /// Average heart rate in bpm
    #[serde(default)]
    pub average_hr: Option<f64>,

    /// Maximum heart rate in bpm
    #[serde(default)]
    pub max_hr: Option<f64>,

    /// Time in each heart rate zone, milliseconds, keyed by zone id
    ///
    /// Keys are kept as strings so unknown zones can be dropped by the
    /// normalizer instead of failing deserialization.
    #[serde(default)]
    pub zone_duration: Option<BTreeMap<String, Option<f64>>>,
}

impl DailyRecord {
    /// Record with only a date set
    pub fn empty(date: NaiveDate) -> Self {
        DailyRecord {
            date,
            recovery_score: None,
            sleep_data: None,
            strain_data: None,
        }
    }
}

/// Sort records newest-first, the order the provider delivers them in
pub fn sort_newest_first(records: &mut [DailyRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}
