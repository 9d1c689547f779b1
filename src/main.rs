use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use healthweek::config::AppConfig;
use healthweek::error::HealthWeekError;
use healthweek::logging::{init_logging, LogLevel};
use healthweek::report::{OutputFormat, TerminalReport};
use healthweek::window::parse_window_start;
use healthweek::{
    ChatRequest, Clock, ConversationTurn, DailyRecordNormalizer, JsonFileSource, RecordSource,
    WeeklyInsights, WeeklyView, WindowNavigator,
};

/// healthweek - Weekly Health Metrics CLI
///
/// Summarizes recovery, sleep, strain and heart rate zones for a seven-day
/// window of daily health records.
#[derive(Parser)]
#[command(name = "healthweek")]
#[command(version)]
#[command(about = "Weekly health metrics dashboard", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Prev,
    Next,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the weekly dashboard for a window
    Summary {
        /// Records file (JSON array of daily records)
        #[arg(short, long)]
        file: PathBuf,

        /// First day of the window (YYYY-MM-DD, default: six days ago)
        #[arg(short, long)]
        start: Option<String>,

        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },

    /// Move a window one week backward or forward
    Navigate {
        /// First day of the current window (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Direction to move
        #[arg(short, long, value_enum)]
        direction: Direction,
    },

    /// Analyze trends and patterns in a window
    Insights {
        /// Records file (JSON array of daily records)
        #[arg(short, long)]
        file: PathBuf,

        /// First day of the window (YYYY-MM-DD, default: six days ago)
        #[arg(short, long)]
        start: Option<String>,

        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },

    /// Build an assistant request for a window
    ChatRequest {
        /// Records file (JSON array of daily records)
        #[arg(short, long)]
        file: PathBuf,

        /// Question for the assistant
        #[arg(short, long)]
        query: String,

        /// First day of the window (YYYY-MM-DD, default: six days ago)
        #[arg(short, long)]
        start: Option<String>,

        /// Prior conversation turns (JSON array)
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::resolve(cli.config.as_deref())?;

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config).context("Failed to initialize logging")?;

    if !config.display.color {
        colored::control::set_override(false);
    }

    let clock = config.window.clock();

    match cli.command {
        Commands::Summary { file, start, format } => {
            let format = resolve_format(format.as_deref(), &config)?;
            let navigator = navigator_for(clock, start.as_deref())?;
            let records = JsonFileSource::new(&file).fetch_window(navigator.anchor())?;

            match WeeklyView::build(&records, &navigator) {
                Ok(view) => println!("{}", TerminalReport::render(&view, format)?),
                Err(err) => report_or_fail(err)?,
            }
        }

        Commands::Navigate { start, direction } => {
            let mut navigator = navigator_for(clock, Some(start.as_str()))?;

            let moved = match direction {
                Direction::Prev => {
                    navigator.move_backward();
                    true
                }
                Direction::Next => navigator.move_forward(),
            };

            let range = navigator.current_range();
            println!("{}", range.label.bold());
            if !moved {
                println!("{}", "Already at the most recent week".yellow());
            }
            println!("start: {}", range.query_start());
            println!("forward permitted: {}", navigator.can_move_forward());
        }

        Commands::Insights { file, start, format } => {
            let format = resolve_format(format.as_deref(), &config)?;
            let navigator = navigator_for(clock, start.as_deref())?;
            let records = JsonFileSource::new(&file).fetch_window(navigator.anchor())?;
            let days = DailyRecordNormalizer::normalize_all(&records);

            match WeeklyInsights::analyze(&days, &config.insights) {
                Ok(insights) => match format {
                    OutputFormat::Text => {
                        println!("{}", navigator.current_range().label.bold());
                        println!("{}", TerminalReport::render_insights(&insights)?);
                    }
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&insights)?),
                },
                Err(err) => report_or_fail(err.into())?,
            }
        }

        Commands::ChatRequest {
            file,
            query,
            start,
            history,
        } => {
            let navigator = navigator_for(clock, start.as_deref())?;
            let records = JsonFileSource::new(&file).fetch_window(navigator.anchor())?;
            let view = WeeklyView::build(&records, &navigator)?;

            let mut turns = match history {
                Some(path) => load_history(&path)?,
                None => Vec::new(),
            };
            turns.push(ConversationTurn::User { text: query.clone() });

            let request = ChatRequest::for_view(query, &view, turns)?;
            info!(turns = request.conversation_history.len(), "built assistant request");
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    Ok(())
}

fn resolve_format(format: Option<&str>, config: &AppConfig) -> Result<OutputFormat> {
    match format {
        Some(value) => Ok(value.parse()?),
        None => Ok(config.display.default_format),
    }
}

fn navigator_for<C: Clock>(clock: C, start: Option<&str>) -> Result<WindowNavigator<C>> {
    let requested: Option<NaiveDate> = start.map(parse_window_start).transpose()?;
    Ok(WindowNavigator::for_request(clock, requested))
}

fn load_history(path: &Path) -> Result<Vec<ConversationTurn>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))
}

/// Print warnings in place of the view; propagate real errors
fn report_or_fail(err: HealthWeekError) -> Result<()> {
    if err.is_loading_state() {
        warn!(error = %err, "window has no records");
        println!("{}", err.user_message().dimmed());
        return Ok(());
    }
    Err(err.into())
}
