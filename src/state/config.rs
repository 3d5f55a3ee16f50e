//! Room state configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```json
//! { "row_order": "newest_first", "average_divisor": "window", "max_turns": 10000 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order of the result table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Latest turn on top
    #[default]
    NewestFirst,
    /// Turn 1 on top
    OldestFirst,
}

/// Divisor used by the rolling averages (avg5, avg12, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageDivisor {
    /// Sum of the first N eligible solves divided by N
    #[default]
    Window,
    /// Sum of the first N eligible solves divided by the number of all
    /// eligible solves. Matches what older clients displayed.
    TotalEligible,
}

/// Highest turn number accepted by default.
pub const DEFAULT_MAX_TURNS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub row_order: RowOrder,
    pub average_divisor: AverageDivisor,

    /// Times with a turn number above this are dropped; it also bounds the
    /// number of result table rows
    pub max_turns: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            row_order: RowOrder::default(),
            average_divisor: AverageDivisor::default(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RoomConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded room config");
        Ok(config)
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    pub fn with_average_divisor(mut self, average_divisor: AverageDivisor) -> Self {
        self.average_divisor = average_divisor;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Whether a turn number can appear in a room using this config.
    pub fn accepts_turn(&self, turn_no: u32) -> bool {
        (1..=self.max_turns).contains(&turn_no)
    }
}
