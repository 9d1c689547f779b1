//! Weekly insights
//!
//! Trend, consistency and correlation analysis over one window, used as
//! context for the conversational assistant. Unlike [`crate::weekly`], these
//! statistics only consider values that are present: a day without a recovery
//! score is excluded from the recovery mean here.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::AggregationError;
use crate::normalize::{or_zero, NormalizedDay, NormalizedWorkout};

/// Thresholds used by the insight analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    /// Nightly sleep target for sleep debt, minutes
    pub sleep_target_minutes: f64,
    /// Average sleep below this is reported as a deficit, minutes
    pub sleep_deficit_minutes: f64,
    /// Recovery below this counts as a low-recovery day
    pub low_recovery: f64,
    /// Recovery above this counts as a high-recovery day
    pub high_recovery: f64,
    /// Mean recovery below this suggests prioritizing rest
    pub focus_recovery: f64,
    /// Strain at or above this is moderate
    pub moderate_strain: f64,
    /// Strain at or above this is high
    pub high_strain: f64,
    /// Day strain above this counts toward overreaching patterns
    pub overreach_strain: f64,
    /// Consecutive overreaching days that trigger a pattern
    pub overreach_streak: usize,
    /// Minimum absolute slope for a trend to be reported
    pub trend_slope: f64,
}

impl Default for InsightSettings {
    fn default() -> Self {
        InsightSettings {
            sleep_target_minutes: 480.0,
            sleep_deficit_minutes: 420.0,
            low_recovery: 33.0,
            high_recovery: 66.0,
            focus_recovery: 50.0,
            moderate_strain: 8.0,
            high_strain: 14.0,
            overreach_strain: 15.0,
            overreach_streak: 3,
            trend_slope: 0.1,
        }
    }
}

/// Direction of a metric over the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "Improving"),
            Trend::Declining => write!(f, "Declining"),
            Trend::Stable => write!(f, "Stable"),
            Trend::InsufficientData => write!(f, "Insufficient data"),
        }
    }
}

/// Counts per intensity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntensityBands {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryInsights {
    pub average: f64,
    pub trend: Trend,
    pub consistency: f64,
    pub days_below_low: usize,
    pub days_above_high: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepInsights {
    pub average_duration: Option<f64>,
    pub average_efficiency: Option<f64>,
    pub consistency: f64,
    /// Accumulated shortfall against the nightly target, minutes
    pub sleep_debt: f64,
    pub average_rem: Option<f64>,
    pub average_deep: Option<f64>,
    pub average_light: Option<f64>,
    /// Closeness of the stage mix to 25% REM / 20% deep / 55% light (0-100)
    pub quality_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrainInsights {
    pub average: f64,
    pub distribution: IntensityBands,
    pub variability: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutInsights {
    pub total_workouts: usize,
    /// Workouts per day of the window
    pub frequency: f64,
    pub sport_counts: BTreeMap<String, usize>,
    pub total_duration: f64,
    pub average_duration: f64,
    /// `None` when the window has no workouts
    pub intensity: Option<IntensityBands>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlations {
    pub recovery_strain: Option<f64>,
    pub sleep_recovery: Option<f64>,
}

/// Full insight report for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyInsights {
    pub day_count: usize,
    pub recovery: Option<RecoveryInsights>,
    pub sleep: SleepInsights,
    pub strain: Option<StrainInsights>,
    pub workouts: WorkoutInsights,
    pub correlations: Correlations,
    pub patterns: Vec<String>,
    pub focus_areas: Vec<String>,
}

impl WeeklyInsights {
    /// Analyze a window of normalized days
    ///
    /// Days may arrive in any order (the provider sends them newest first);
    /// trends, consistency and streaks run over them oldest first.
    pub fn analyze(
        days: &[NormalizedDay],
        settings: &InsightSettings,
    ) -> Result<Self, AggregationError> {
        if days.is_empty() {
            return Err(AggregationError::EmptyWindow { start: None });
        }

        let mut chronological = days.to_vec();
        chronological.sort_by_key(|d| d.date);
        let days = chronological.as_slice();

        let recoveries = present(days.iter().map(|d| d.recovery_score));
        let sleeps = present(days.iter().map(|d| d.sleep_minutes));
        // Zero strain is treated as "no strain recorded" for insights
        let strains: Vec<f64> = present(days.iter().map(|d| d.day_strain))
            .into_iter()
            .filter(|s| *s != 0.0)
            .collect();

        let insights = WeeklyInsights {
            day_count: days.len(),
            recovery: analyze_recovery(&recoveries, settings),
            sleep: analyze_sleep(days, &sleeps, settings),
            strain: analyze_strain(&strains, settings),
            workouts: analyze_workouts(days, settings),
            correlations: Correlations {
                recovery_strain: paired_correlation(days, |d| d.recovery_score, |d| d.day_strain),
                sleep_recovery: paired_correlation(days, |d| d.sleep_minutes, |d| d.recovery_score),
            },
            patterns: significant_patterns(&recoveries, &sleeps, days, settings),
            focus_areas: focus_areas(&recoveries, &sleeps, days, settings),
        };

        debug!(
            days = insights.day_count,
            patterns = insights.patterns.len(),
            focus_areas = insights.focus_areas.len(),
            "computed weekly insights"
        );

        Ok(insights)
    }
}

fn present(values: impl Iterator<Item = Option<f64>>) -> Vec<f64> {
    values.flatten().collect()
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

fn analyze_recovery(values: &[f64], settings: &InsightSettings) -> Option<RecoveryInsights> {
    let average = mean_of(values)?;
    Some(RecoveryInsights {
        average,
        trend: trend(values, settings.trend_slope),
        consistency: consistency(values),
        days_below_low: values.iter().filter(|v| **v < settings.low_recovery).count(),
        days_above_high: values.iter().filter(|v| **v > settings.high_recovery).count(),
    })
}

fn analyze_sleep(days: &[NormalizedDay], sleeps: &[f64], settings: &InsightSettings) -> SleepInsights {
    let efficiencies = present(days.iter().map(|d| d.sleep_efficiency));
    let rem = present(days.iter().map(|d| d.rem_sleep_minutes));
    let deep = present(days.iter().map(|d| d.deep_sleep_minutes));
    let light = present(days.iter().map(|d| d.light_sleep_minutes));

    SleepInsights {
        average_duration: mean_of(sleeps),
        average_efficiency: mean_of(&efficiencies),
        consistency: consistency(sleeps),
        sleep_debt: sleep_debt(sleeps, settings.sleep_target_minutes),
        average_rem: mean_of(&rem),
        average_deep: mean_of(&deep),
        average_light: mean_of(&light),
        quality_score: sleep_quality_score(&rem, &deep, &light),
    }
}

fn analyze_strain(strains: &[f64], settings: &InsightSettings) -> Option<StrainInsights> {
    let average = mean_of(strains)?;
    Some(StrainInsights {
        average,
        distribution: bands(strains.iter().copied(), settings),
        variability: strains.iter().population_std_dev(),
        peak: strains.iter().copied().fold(f64::MIN, f64::max),
    })
}

fn analyze_workouts(days: &[NormalizedDay], settings: &InsightSettings) -> WorkoutInsights {
    let workouts: Vec<&NormalizedWorkout> = days.iter().flat_map(|d| d.workouts.iter()).collect();

    let mut sport_counts = BTreeMap::new();
    for workout in &workouts {
        if let Some(sport) = &workout.sport {
            *sport_counts.entry(sport.clone()).or_insert(0) += 1;
        }
    }

    let total_duration: f64 = workouts.iter().map(|w| or_zero(w.duration_minutes)).sum();
    let total_workouts = workouts.len();

    WorkoutInsights {
        total_workouts,
        frequency: total_workouts as f64 / days.len() as f64,
        sport_counts,
        total_duration,
        average_duration: if total_workouts > 0 {
            total_duration / total_workouts as f64
        } else {
            0.0
        },
        intensity: if workouts.is_empty() {
            None
        } else {
            Some(bands(workouts.iter().map(|w| or_zero(w.strain)), settings))
        },
    }
}

fn bands(values: impl Iterator<Item = f64>, settings: &InsightSettings) -> IntensityBands {
    values.fold(IntensityBands::default(), |mut acc, value| {
        if value < settings.moderate_strain {
            acc.low += 1;
        } else if value < settings.high_strain {
            acc.moderate += 1;
        } else {
            acc.high += 1;
        }
        acc
    })
}

/// Least-squares slope of `values` against their index
fn slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().mean();

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

fn trend(values: &[f64], threshold: f64) -> Trend {
    if values.len() < 2 {
        return Trend::InsufficientData;
    }
    let slope = slope(values);
    if slope > threshold {
        Trend::Improving
    } else if slope < -threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Day-to-day consistency in [0, 1]; 1 for a flat series, 0 below two values
fn consistency(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let (min, max) = values
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let range = max - min;
    if range == 0.0 {
        return 1.0;
    }

    let variations: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let spread = variations.iter().population_std_dev();
    (1.0 - spread / range).clamp(0.0, 1.0)
}

fn sleep_debt(durations: &[f64], target: f64) -> f64 {
    durations.iter().map(|d| (target - d).max(0.0)).sum()
}

fn sleep_quality_score(rem: &[f64], deep: &[f64], light: &[f64]) -> Option<f64> {
    if rem.is_empty() || deep.is_empty() || light.is_empty() {
        return None;
    }

    let rem_total: f64 = rem.iter().sum();
    let deep_total: f64 = deep.iter().sum();
    let light_total: f64 = light.iter().sum();
    let total = rem_total + deep_total + light_total;
    if total == 0.0 {
        return None;
    }

    let rem_score = 1.0 - (0.25 - rem_total / total).abs();
    let deep_score = 1.0 - (0.20 - deep_total / total).abs();
    let light_score = 1.0 - (0.55 - light_total / total).abs();

    let score = (rem_score * 0.35 + deep_score * 0.35 + light_score * 0.30) * 100.0;
    Some((score * 100.0).round() / 100.0)
}

/// Pearson correlation over days where both values are present
fn paired_correlation(
    days: &[NormalizedDay],
    x: impl Fn(&NormalizedDay) -> Option<f64>,
    y: impl Fn(&NormalizedDay) -> Option<f64>,
) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = days
        .iter()
        .filter_map(|d| Some((x(d)?, y(d)?)))
        .unzip();

    if xs.len() < 2 {
        return None;
    }

    let sx = xs.iter().population_std_dev();
    let sy = ys.iter().population_std_dev();
    if sx == 0.0 || sy == 0.0 {
        return None;
    }

    Some(xs.iter().population_covariance(ys.iter()) / (sx * sy))
}

fn significant_patterns(
    recoveries: &[f64],
    sleeps: &[f64],
    days: &[NormalizedDay],
    settings: &InsightSettings,
) -> Vec<String> {
    let mut patterns = Vec::new();

    if let Some(average) = mean_of(recoveries) {
        if average < settings.low_recovery {
            patterns.push("Consistently low recovery scores indicate potential overtraining".to_string());
        } else if average > settings.high_recovery {
            patterns.push("Strong recovery pattern indicates good adaptation to training load".to_string());
        }
    }

    if let Some(average) = mean_of(sleeps) {
        if average < settings.sleep_deficit_minutes {
            patterns.push("Consistent sleep deficit may be impacting recovery".to_string());
        }
    }

    let mut streak = 0;
    for strain in days.iter().filter_map(|d| d.day_strain) {
        if strain > settings.overreach_strain {
            streak += 1;
        } else {
            streak = 0;
        }
        if streak >= settings.overreach_streak {
            patterns.push("Multiple consecutive days of high strain detected".to_string());
            break;
        }
    }

    patterns
}

fn focus_areas(
    recoveries: &[f64],
    sleeps: &[f64],
    days: &[NormalizedDay],
    settings: &InsightSettings,
) -> Vec<String> {
    let mut areas = Vec::new();

    if mean_of(recoveries).is_some_and(|avg| avg < settings.focus_recovery) {
        areas.push("Prioritize recovery strategies and rest".to_string());
    }

    if mean_of(sleeps).is_some_and(|avg| avg < settings.sleep_deficit_minutes) {
        areas.push("Increase sleep duration to improve recovery".to_string());
    }

    let strains = present(days.iter().map(|d| d.day_strain));
    if !strains.is_empty() {
        let high_days = strains.iter().filter(|s| **s > settings.overreach_strain).count();
        if high_days as f64 > strains.len() as f64 / 2.0 {
            areas.push("Consider incorporating more low-intensity recovery days".to_string());
        }
    }

    areas
}
