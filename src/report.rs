//! Terminal rendering of weekly views
//!
//! All rounding of minutes and averages happens here. Absent values are shown
//! as `N/A`, never as zero.

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::charts::WorkoutZoneBar;
use crate::dashboard::{DayCard, WeeklyView};
use crate::error::{HealthWeekError, Result, ValidationError};
use crate::insights::WeeklyInsights;

/// Output format for rendered views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = HealthWeekError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ValidationError::Unsupported {
                option: "output format".to_string(),
                value: s.to_string(),
            }
            .into()),
        }
    }
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    label: String,
    #[tabled(rename = "Minutes")]
    minutes: i64,
    #[tabled(rename = "Color")]
    color: String,
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Day")]
    day: u32,
    #[tabled(rename = "Recovery")]
    recovery: String,
    #[tabled(rename = "Sleep (min)")]
    sleep: String,
    #[tabled(rename = "Strain")]
    strain: String,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
}

fn or_na(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "N/A".to_string(),
    }
}

fn percent_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}%", v),
        None => "N/A".to_string(),
    }
}

/// Color for a recovery score on the usual red/yellow/green scale
fn recovery_text(value: Option<f64>) -> ColoredString {
    let text = percent_or_na(value);
    match value {
        Some(v) if v >= 67.0 => text.green(),
        Some(v) if v >= 34.0 => text.yellow(),
        Some(_) => text.red(),
        None => text.dimmed(),
    }
}

/// Terminal renderer for weekly views and insights
pub struct TerminalReport;

impl TerminalReport {
    /// Render a view in the requested format
    pub fn render(view: &WeeklyView, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Self::render_text(view),
            OutputFormat::Json => view.to_json(),
        }
    }

    pub fn render_text(view: &WeeklyView) -> Result<String> {
        let mut out = String::new();
        Self::write_view(&mut out, view)?;
        Ok(out)
    }

    /// Render an insight report
    pub fn render_insights(insights: &WeeklyInsights) -> Result<String> {
        let mut out = String::new();
        Self::write_insights(&mut out, insights)?;
        Ok(out)
    }

    pub fn write_view<W: Write>(out: &mut W, view: &WeeklyView) -> fmt::Result {
        let summary = &view.summary;

        writeln!(out, "{}", view.range.label.bold())?;
        let hint = if view.forward_permitted {
            "< previous week | next week >"
        } else {
            "< previous week"
        };
        writeln!(out, "{}", hint.dimmed())?;
        writeln!(out)?;

        writeln!(out, "{}", "Weekly Summary".cyan().bold())?;
        writeln!(
            out,
            "  Total sleep:     {} min ({} h)",
            summary.rounded_sleep_minutes(),
            summary.rounded_sleep_hours()
        )?;
        writeln!(out, "  Avg recovery:    {:.1}%", summary.average_recovery)?;
        writeln!(out, "  Avg strain:      {:.1}", summary.average_strain)?;
        writeln!(
            out,
            "  Workouts:        {} min across {} workouts",
            summary.rounded_workout_minutes(),
            summary.workout_count
        )?;
        writeln!(out)?;

        writeln!(out, "{}", "Heart Rate Zones".cyan().bold())?;
        if view.zone_distribution.is_empty() {
            writeln!(out, "  {}", "No zone data".dimmed())?;
        } else {
            let rows: Vec<ZoneRow> = view
                .zone_distribution
                .iter()
                .map(|zone| ZoneRow {
                    label: zone.label.clone(),
                    minutes: zone.rounded_minutes(),
                    color: zone.color.clone(),
                })
                .collect();
            writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
        }
        writeln!(out)?;

        writeln!(out, "{}", "Daily Trends".cyan().bold())?;
        let rows: Vec<SeriesRow> = view
            .series
            .iter()
            .map(|point| SeriesRow {
                day: point.day_of_month,
                recovery: percent_or_na(point.recovery),
                sleep: or_na(point.sleep_minutes, 0),
                strain: or_na(point.strain, 1),
                efficiency: percent_or_na(point.sleep_efficiency),
            })
            .collect();
        writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;

        for card in &view.days {
            writeln!(out)?;
            Self::write_day(out, card)?;
        }

        Ok(())
    }

    fn write_day<W: Write>(out: &mut W, card: &DayCard) -> fmt::Result {
        let day = &card.day;

        writeln!(out, "{}", day.date.format("%A, %b %-d").to_string().bold())?;
        writeln!(out, "  Recovery:    {}", recovery_text(day.recovery_score))?;
        writeln!(out, "  Sleep:       {} min", or_na(day.sleep_minutes, 0))?;
        writeln!(out, "  Efficiency:  {}", percent_or_na(day.sleep_efficiency))?;
        writeln!(
            out,
            "  Stages:      light {} / deep {} / REM {} / awake {} min",
            or_na(day.light_sleep_minutes, 0),
            or_na(day.deep_sleep_minutes, 0),
            or_na(day.rem_sleep_minutes, 0),
            or_na(day.awake_minutes, 0)
        )?;
        writeln!(out, "  Day strain:  {}", or_na(day.day_strain, 1))?;

        for workout in &card.workouts {
            let w = &workout.workout;
            writeln!(
                out,
                "  {} {} min, strain {}, avg HR {}, max HR {}",
                w.sport_label().magenta(),
                or_na(w.duration_minutes, 0),
                or_na(w.strain, 1),
                or_na(w.average_hr, 0),
                or_na(w.max_hr, 0)
            )?;
            for bar in &workout.zones {
                writeln!(out, "    {}", Self::zone_bar_line(bar))?;
            }
        }

        Ok(())
    }

    fn zone_bar_line(bar: &WorkoutZoneBar) -> String {
        const WIDTH: f64 = 20.0;
        let filled = (bar.share_of_workout.clamp(0.0, 1.0) * WIDTH).round() as usize;
        format!(
            "{:<18} {:>4} min {:<20} {:>3.0}%",
            bar.label,
            bar.minutes.round() as i64,
            "#".repeat(filled),
            bar.percent_of_workout()
        )
    }

    pub fn write_insights<W: Write>(out: &mut W, insights: &WeeklyInsights) -> fmt::Result {
        writeln!(out, "{}", "Weekly Insights".cyan().bold())?;
        match &insights.recovery {
            Some(recovery) => {
                writeln!(
                    out,
                    "  Recovery:    {:.1}% avg, {} trend, consistency {:.2}",
                    recovery.average, recovery.trend, recovery.consistency
                )?;
                writeln!(
                    out,
                    "               {} low days, {} high days",
                    recovery.days_below_low, recovery.days_above_high
                )?;
            }
            None => writeln!(out, "  Recovery:    N/A")?,
        }

        let sleep = &insights.sleep;
        writeln!(
            out,
            "  Sleep:       {} min avg, efficiency {}, debt {:.0} min",
            or_na(sleep.average_duration, 0),
            percent_or_na(sleep.average_efficiency),
            sleep.sleep_debt
        )?;
        writeln!(out, "  Quality:     {}", or_na(sleep.quality_score, 2))?;

        match &insights.strain {
            Some(strain) => writeln!(
                out,
                "  Strain:      {:.1} avg, peak {:.1}, std dev {:.2}",
                strain.average, strain.peak, strain.variability
            )?,
            None => writeln!(out, "  Strain:      N/A")?,
        }

        let workouts = &insights.workouts;
        writeln!(
            out,
            "  Workouts:    {} total, {:.1} per day, {:.0} min avg",
            workouts.total_workouts, workouts.frequency, workouts.average_duration
        )?;
        for (sport, count) in &workouts.sport_counts {
            writeln!(out, "               {}: {}", sport, count)?;
        }

        let correlations = &insights.correlations;
        writeln!(
            out,
            "  Correlation: recovery/strain {}, sleep/recovery {}",
            or_na(correlations.recovery_strain, 2),
            or_na(correlations.sleep_recovery, 2)
        )?;

        if !insights.patterns.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "Patterns".yellow().bold())?;
            for pattern in &insights.patterns {
                writeln!(out, "  - {}", pattern)?;
            }
        }

        if !insights.focus_areas.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "Focus Areas".green().bold())?;
            for area in &insights.focus_areas {
                writeln!(out, "  - {}", area)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyRecord, StrainData, Workout};
    use crate::window::{FixedClock, WindowNavigator};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn view() -> WeeklyView {
        let mut zones = BTreeMap::new();
        zones.insert("zone_two_milli".to_string(), Some(600_000.0));

        let records = vec![
            DailyRecord {
                date: NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
                recovery_score: Some(72.0),
                sleep_data: None,
                strain_data: Some(StrainData {
                    day_strain: Some(11.25),
                    workouts: Some(vec![Workout {
                        sport: Some("Rowing".to_string()),
                        duration: Some(10.0),
                        strain: None,
                        average_hr: None,
                        max_hr: None,
                        zone_duration: Some(zones),
                    }]),
                }),
            },
            DailyRecord::empty(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()),
        ];
        let navigator = WindowNavigator::new(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 7).unwrap()));
        WeeklyView::build(&records, &navigator).unwrap()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_text() {
        let text = TerminalReport::render_text(&view()).unwrap();

        assert!(text.contains("May 1, 2024 - May 7, 2024"));
        assert!(text.contains("Avg recovery:    36.0%"));
        assert!(text.contains("Avg strain:      5.6"));
        assert!(text.contains("10 min across 1 workouts"));
        assert!(text.contains("Zone 2 (Moderate)"));
        assert!(text.contains("Rowing"));
        assert!(text.contains("N/A"));
        assert!(!text.contains("next week"));
    }

    #[test]
    fn test_render_json() {
        let json = TerminalReport::render(&view(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["workout_count"], 1);
    }

    #[test]
    fn test_zone_bar_width() {
        let bar = WorkoutZoneBar {
            zone: crate::zones::ZoneId::Zone3,
            label: "Zone 3 (Hard)".to_string(),
            minutes: 30.0,
            color: "#faa61a".to_string(),
            share_of_workout: 0.75,
        };
        let line = TerminalReport::zone_bar_line(&bar);
        assert!(line.contains(&"#".repeat(15)));
        assert!(line.contains("75%"));
    }

    /// Writer that rejects every write
    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_write_errors_propagate() {
        assert!(TerminalReport::write_view(&mut ClosedWriter, &view()).is_err());

        let days = crate::normalize::DailyRecordNormalizer::normalize_all(&[DailyRecord::empty(
            NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
        )]);
        let insights =
            WeeklyInsights::analyze(&days, &crate::insights::InsightSettings::default()).unwrap();
        assert!(TerminalReport::write_insights(&mut ClosedWriter, &insights).is_err());

        let text = TerminalReport::render_insights(&insights).unwrap();
        assert!(text.contains("Recovery:    N/A"));
    }

    #[test]
    fn test_na_helpers() {
        assert_eq!(or_na(None, 1), "N/A");
        assert_eq!(or_na(Some(0.0), 1), "0.0");
        assert_eq!(percent_or_na(Some(91.6)), "92%");
    }
}
