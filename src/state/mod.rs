//! State management module for Multicubing.
//!
//! - `participant` - Room participants keyed by username
//! - `message` - Chat log keyed by message id
//! - `solve` - Solve times, penalty flags and turns
//! - `timer` - Local solve timer
//! - `table` - Result table derived from participants and times
//! - `stats` - Statistics of the local user
//! - `room` - The room snapshot and its transitions
//! - `event` - Inbound events, one per transition
//! - `store` - Container that applies events in order
//! - `config` - Table ordering and averaging options
//! - `registration` - Registration form validation
//!
//! # Architecture
//!
//! ```text
//!  transport frame ──▶ RoomEvent ──▶ RoomStore::dispatch
//!                                          │
//!                                          ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           RoomState                             │
//! │                                                                 │
//! │  ┌──────────────────┐ ┌──────────────┐ ┌─────────────────────┐  │
//! │  │ ParticipantList  │ │  MessageLog  │ │   Vec<SolveTime>    │  │
//! │  │ username → entry │ │  id → entry  │ │ (username, turn_no) │  │
//! │  └────────┬─────────┘ └──────────────┘ └──────────┬──────────┘  │
//! │           │                                       │             │
//! │           ├───────────────┬───────────────────────┤             │
//! │           ▼               ▼                       ▼             │
//! │        me (derived)   ResultTable (derived)   Stats (derived)   │
//! │                                                                 │
//! │   Turn        Timer: Cleared ─▶ Running ─▶ Paused      Flag     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use multicubing_state::state::{RoomConfig, RoomEvent, RoomStore};
//!
//! let mut store = RoomStore::new(RoomConfig::default());
//! store.dispatch(RoomEvent::EnterRoom {
//!     room_slug: "cube-room".into(),
//!     username: "alice".into(),
//! });
//! store.dispatch_json(r#"{"type": "update_time", "time": {"username": "alice", "turn_no": 1, "time": 9500}}"#)?;
//! ```

pub mod config;
pub mod event;
pub mod message;
pub mod participant;
pub mod registration;
pub mod room;
pub mod solve;
pub mod stats;
pub mod store;
pub mod table;
pub mod timer;

// Re-export commonly used types
pub use config::{AverageDivisor, ConfigError, RoomConfig, RowOrder};
pub use event::{EventError, RoomEvent};
pub use message::{Message, MessageLog};
pub use participant::{Participant, ParticipantList, User};
pub use registration::{
    EmailError, LoginError, RegisterRequest, RegistrationError, RegistrationErrors,
    RegistrationForm,
};
pub use room::RoomState;
pub use solve::{Flag, SolveTime, Turn};
pub use stats::{Stats, ROLLING_WINDOWS};
pub use store::RoomStore;
pub use table::{ResultTable, TableRow};
pub use timer::{Timer, TimerState};
