//! Seven-day window navigation
//!
//! A window is identified by its first day (the anchor) and always spans
//! `[anchor, anchor + 6]`. Moving backward is unbounded; moving forward is
//! rejected whenever the new window would end after today.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ValidationError};

/// Number of days in a window
pub const WINDOW_DAYS: i64 = 7;

/// Offset from a window's first day to its last day
pub const WINDOW_SPAN: i64 = WINDOW_DAYS - 1;

/// Source of the current calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Resolved date range of a window, with its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl DateWindow {
    /// Window starting at `start`
    pub fn starting(start: NaiveDate) -> Self {
        let end = start + Duration::days(WINDOW_SPAN);
        DateWindow {
            start,
            end,
            label: format_range_label(start, end),
        }
    }

    /// Start date as sent to the data provider (`YYYY-MM-DD`)
    pub fn query_start(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The seven dates of the window, oldest first
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..WINDOW_DAYS)
            .map(|offset| self.start + Duration::days(offset))
            .collect()
    }
}

/// Holds the current window anchor and moves it week by week
pub struct WindowNavigator<C: Clock = SystemClock> {
    anchor: NaiveDate,
    clock: C,
}

impl WindowNavigator<SystemClock> {
    /// Navigator on the most recent complete window, using the system clock
    pub fn current() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> WindowNavigator<C> {
    /// Navigator anchored at `today - 6`
    pub fn new(clock: C) -> Self {
        let anchor = latest_anchor(clock.today());
        WindowNavigator { anchor, clock }
    }

    /// Navigator anchored at an explicit date
    pub fn with_anchor(clock: C, anchor: NaiveDate) -> Self {
        WindowNavigator { anchor, clock }
    }

    /// Navigator for a caller-supplied start, clamped to the latest window
    pub fn for_request(clock: C, requested: Option<NaiveDate>) -> Self {
        let anchor = clamp_requested_start(requested, clock.today());
        WindowNavigator { anchor, clock }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Move one week back. Always succeeds.
    pub fn move_backward(&mut self) {
        self.anchor -= Duration::days(WINDOW_DAYS);
        debug!(anchor = %self.anchor, "moved window backward");
    }

    /// Move one week forward if the new window ends on or before today
    ///
    /// Returns whether the move was accepted; a rejected move leaves the
    /// anchor unchanged.
    pub fn move_forward(&mut self) -> bool {
        let candidate = self.anchor + Duration::days(WINDOW_DAYS);
        if !window_fits(candidate, self.clock.today()) {
            debug!(anchor = %self.anchor, "forward navigation rejected");
            return false;
        }
        self.anchor = candidate;
        debug!(anchor = %self.anchor, "moved window forward");
        true
    }

    /// Whether `move_forward` would currently be accepted
    pub fn can_move_forward(&self) -> bool {
        window_fits(self.anchor + Duration::days(WINDOW_DAYS), self.clock.today())
    }

    pub fn current_range(&self) -> DateWindow {
        DateWindow::starting(self.anchor)
    }

    /// Whether records fetched for `start` still belong to the current window
    ///
    /// Fetch results for a superseded window must be discarded by the caller.
    pub fn is_current(&self, start: NaiveDate) -> bool {
        self.anchor == start
    }
}

/// Anchor of the latest window that ends today
pub fn latest_anchor(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WINDOW_SPAN)
}

fn window_fits(start: NaiveDate, today: NaiveDate) -> bool {
    start + Duration::days(WINDOW_SPAN) <= today
}

/// Format a range as `"May 1, 2024 - May 7, 2024"`
pub fn format_range_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_label_date(start), format_label_date(end))
}

fn format_label_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Parse a window start in ISO `YYYY-MM-DD` form
pub fn parse_window_start(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            value: value.to_string(),
        }
        .into()
    })
}

/// Resolve the start date for a provider request
///
/// A missing or future start falls back to the latest window; a start whose
/// window would run past today is pulled back so the window ends today.
pub fn clamp_requested_start(requested: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    match requested {
        Some(start) if start <= today && window_fits(start, today) => start,
        Some(start) => {
            debug!(%start, %today, "requested window runs past today, clamping");
            latest_anchor(today)
        }
        None => latest_anchor(today),
    }
}
