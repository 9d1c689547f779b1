// Library interface for healthweek modules
// This allows integration tests and benches to access the core functionality

pub mod assistant;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod insights;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod report;
pub mod source;
pub mod weekly;
pub mod window;
pub mod zones;

// Re-export commonly used types for convenience
pub use models::*;
pub use assistant::{ChatRequest, ChatResponse, ConversationTurn};
pub use charts::{ChartProjector, SeriesPoint, WorkoutZoneBar};
pub use dashboard::WeeklyView;
pub use error::{AggregationError, HealthWeekError, Result, ValidationError};
pub use insights::{InsightSettings, WeeklyInsights};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use normalize::{DailyRecordNormalizer, NormalizedDay, NormalizedWorkout};
pub use source::{JsonFileSource, RecordSource};
pub use weekly::{WeeklyAggregator, WeeklySummary};
pub use window::{Clock, DateWindow, FixedClock, SystemClock, WindowNavigator};
pub use zones::{ZoneId, ZoneMinutes, ZoneTable};
