//! Local solve timer.
//!
//! ```text
//! ┌─────────┐  start   ┌─────────┐  stop   ┌────────┐
//! │ Cleared │─────────▶│ Running │────────▶│ Paused │
//! └─────────┘          └─────────┘         └───┬────┘
//!      ▲                    ▲   start          │
//!      │                    └──────────────────┤
//!      └────────────────── clear ──────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Cleared,
    Running,
    Paused,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleared => "cleared",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub state: TimerState,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,

    /// Set once the timer widget is ready; reset by every start
    pub loaded: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self) {
        self.loaded = true;
    }

    pub fn start_at(&mut self, now: DateTime<Utc>) {
        self.start = Some(now);
        self.end = None;
        self.state = TimerState::Running;
        self.loaded = false;
    }

    /// Stopping never returns to `Running`; only a fresh start does.
    pub fn stop_at(&mut self, now: DateTime<Utc>) {
        self.end = Some(now);
        self.state = TimerState::Paused;
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.state = TimerState::Cleared;
    }

    /// Time on the clock. A running timer is measured against `now`.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        let start = self.start?;
        let end = match self.state {
            TimerState::Running => now,
            _ => self.end?,
        };
        Some((end - start).max(Duration::zero()))
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed_at(Utc::now())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "state": self.state.as_str(),
            "start": self.start.map(|t| t.to_rfc3339()),
            "end": self.end.map(|t| t.to_rfc3339()),
            "loaded": self.loaded
        })
    }
}
