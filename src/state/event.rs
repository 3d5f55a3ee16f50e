//! Inbound room events.
//!
//! One variant per [`RoomState`](super::room::RoomState) transition. Frames
//! from the transport are JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "update_time", "time": {"username": "alice", "turn_no": 1, "time": 9500}}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::message::Message;
use super::participant::Participant;
use super::solve::{SolveTime, Turn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    EnterRoom {
        room_slug: String,
        username: String,
    },
    ResetRoom,
    UpdateRoom {
        #[serde(default)]
        participants: Vec<Participant>,
        #[serde(default)]
        messages: Vec<Message>,
        #[serde(default)]
        times: Vec<SolveTime>,
        #[serde(default)]
        turn: Option<Turn>,
    },
    StopLoading,
    LeaveRoom,
    UpdateParticipant {
        participant: Participant,
    },
    DeleteParticipant {
        username: String,
    },
    UpdateMessage {
        message: Message,
    },
    DeleteMessage {
        id: u64,
    },
    UpdateTurn {
        #[serde(default)]
        turn: Option<Turn>,
    },
    UpdateTime {
        time: SolveTime,
    },
    LoadTimer,
    StartTimer,
    StopTimer,
    ClearTimer,
    NextFlag,
    PrevFlag,
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Malformed room event: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl RoomEvent {
    pub fn from_json(frame: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(frame)?)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Event name as used in the `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EnterRoom { .. } => "enter_room",
            Self::ResetRoom => "reset_room",
            Self::UpdateRoom { .. } => "update_room",
            Self::StopLoading => "stop_loading",
            Self::LeaveRoom => "leave_room",
            Self::UpdateParticipant { .. } => "update_participant",
            Self::DeleteParticipant { .. } => "delete_participant",
            Self::UpdateMessage { .. } => "update_message",
            Self::DeleteMessage { .. } => "delete_message",
            Self::UpdateTurn { .. } => "update_turn",
            Self::UpdateTime { .. } => "update_time",
            Self::LoadTimer => "load_timer",
            Self::StartTimer => "start_timer",
            Self::StopTimer => "stop_timer",
            Self::ClearTimer => "clear_timer",
            Self::NextFlag => "next_flag",
            Self::PrevFlag => "prev_flag",
        }
    }

    /// Whether the event comes from the local UI rather than the server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::LoadTimer
                | Self::StartTimer
                | Self::StopTimer
                | Self::ClearTimer
                | Self::NextFlag
                | Self::PrevFlag
        )
    }
}
