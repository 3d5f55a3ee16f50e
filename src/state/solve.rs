//! Solve results, penalty flags and turns.
//!
//! A room progresses in turns. Every participant records at most one
//! [`SolveTime`] per turn, optionally marked with a [`Flag`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Penalty marker attached to a solve.
///
/// The flags form a ring that the timer UI cycles through:
///
/// ```text
///   ┌──────┐  next  ┌───────┐  next  ┌─────┐
///   │  Ok  │───────▶│ Plus2 │───────▶│ Dnf │
///   └──────┘        └───────┘        └──┬──┘
///       ▲                               │
///       └───────────── next ────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Flag {
    /// No penalty
    #[default]
    Ok,
    /// Two second penalty
    Plus2,
    /// Did not finish
    Dnf,
}

impl Flag {
    /// Next flag on the ring.
    pub fn next(self) -> Self {
        match self {
            Self::Ok => Self::Plus2,
            Self::Plus2 => Self::Dnf,
            Self::Dnf => Self::Ok,
        }
    }

    /// Previous flag on the ring.
    pub fn prev(self) -> Self {
        match self {
            Self::Ok => Self::Dnf,
            Self::Plus2 => Self::Ok,
            Self::Dnf => Self::Plus2,
        }
    }

    pub fn is_dnf(&self) -> bool {
        matches!(self, Self::Dnf)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Plus2 => "PLUS2",
            Self::Dnf => "DNF",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The server sends `null` for an unflagged solve.
fn flag_or_ok<'de, D>(deserializer: D) -> Result<Flag, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Flag>::deserialize(deserializer)?.unwrap_or_default())
}

/// A recorded solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveTime {
    /// Who solved
    pub username: String,

    /// Turn number, starting at 1
    pub turn_no: u32,

    /// Elapsed time in milliseconds
    pub time: u64,

    #[serde(default, deserialize_with = "flag_or_ok")]
    pub flag: Flag,
}

impl SolveTime {
    pub fn new(username: impl Into<String>, turn_no: u32, time: u64) -> Self {
        Self {
            username: username.into(),
            turn_no,
            time,
            flag: Flag::Ok,
        }
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flag = flag;
        self
    }

    pub fn is_dnf(&self) -> bool {
        self.flag.is_dnf()
    }

    /// Whether this solve belongs to the given participant and turn.
    pub fn matches(&self, username: &str, turn_no: u32) -> bool {
        self.turn_no == turn_no && self.username == username
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "turn_no": self.turn_no,
            "time": self.time,
            "flag": self.flag.as_str()
        })
    }
}

/// The currently active turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub number: u32,

    /// Scramble sequence shown to every solver
    #[serde(default)]
    pub scramble: Option<String>,

    #[serde(default)]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Turn {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            scramble: None,
            started_at: None,
        }
    }

    pub fn with_scramble(mut self, scramble: impl Into<String>) -> Self {
        self.scramble = Some(scramble.into());
        self
    }
}
