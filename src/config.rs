/// Runtime configuration for the tracker
///
/// Built once at startup from command line arguments and then passed down
/// explicitly. Nothing in the core reads configuration from global state.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::DEFAULT_START_OF_DAY_HOUR;

/// Number of weeks shown in a habit heatmap by default
pub const DEFAULT_HEATMAP_WEEKS: u32 = 8;

/// Longest heatmap the driver will render
pub const MAX_HEATMAP_WEEKS: u32 = 52;

const HABITS_FILE: &str = "habits.json";
const PREFERENCES_FILE: &str = "preferences.json";

/// Errors in user-supplied configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("start of day hour must be between 0 and 23, got {0}")]
    InvalidStartOfDayHour(u32),

    #[error("heatmap weeks must be between 1 and 52, got {0}")]
    InvalidHeatmapWeeks(u32),
}

/// Validated tracker settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Directory holding the habits and preferences files
    pub data_dir: PathBuf,
    /// Local hour at which a new habit day begins
    pub start_of_day_hour: u32,
    /// Width of the heatmap in weeks
    pub heatmap_weeks: u32,
}

impl TrackerConfig {
    pub fn new(
        data_dir: PathBuf,
        start_of_day_hour: u32,
        heatmap_weeks: u32,
    ) -> Result<Self, ConfigError> {
        if start_of_day_hour > 23 {
            return Err(ConfigError::InvalidStartOfDayHour(start_of_day_hour));
        }
        if heatmap_weeks == 0 || heatmap_weeks > MAX_HEATMAP_WEEKS {
            return Err(ConfigError::InvalidHeatmapWeeks(heatmap_weeks));
        }
        Ok(Self {
            data_dir,
            start_of_day_hour,
            heatmap_weeks,
        })
    }

    /// Default settings rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            start_of_day_hour: DEFAULT_START_OF_DAY_HOUR,
            heatmap_weeks: DEFAULT_HEATMAP_WEEKS,
        }
    }

    pub fn habits_path(&self) -> PathBuf {
        self.data_dir.join(HABITS_FILE)
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }
}
