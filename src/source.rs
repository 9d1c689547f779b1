//! Daily record sources

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, ValidationError};
use crate::models::{sort_newest_first, DailyRecord};
use crate::window::DateWindow;

/// Supplies the daily records of one window
pub trait RecordSource {
    /// Records dated within `[start, start + 6]`, newest first
    ///
    /// An empty result means the window has not loaded.
    fn fetch_window(&self, start: NaiveDate) -> Result<Vec<DailyRecord>>;
}

/// Records read from a JSON array of daily records on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in the file, in file order
    pub fn load_all(&self) -> Result<Vec<DailyRecord>> {
        if !self.path.exists() {
            return Err(ValidationError::FileNotFound {
                path: self.path.clone(),
            }
            .into());
        }

        let content = fs::read_to_string(&self.path)?;
        let records: Vec<DailyRecord> = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), records = records.len(), "loaded records file");
        Ok(records)
    }
}

impl RecordSource for JsonFileSource {
    fn fetch_window(&self, start: NaiveDate) -> Result<Vec<DailyRecord>> {
        let window = DateWindow::starting(start);
        let mut records = select_window(self.load_all()?, &window);
        sort_newest_first(&mut records);

        info!(
            window = %window.label,
            records = records.len(),
            "fetched window from file"
        );
        Ok(records)
    }
}

/// Keep only records dated inside `window`
pub fn select_window(records: Vec<DailyRecord>, window: &DateWindow) -> Vec<DailyRecord> {
    records
        .into_iter()
        .filter(|record| window.contains(record.date))
        .collect()
}
