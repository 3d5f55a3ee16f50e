//! Multicubing State Library
//!
//! This crate provides the client-side state of a Multicubing room.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Room Synchronizer** - Merges participants, chat, solve times, the
//!   active turn and the local timer from server updates that may arrive
//!   out of order or twice.
//!
//! - **Derived Views** - A result table (turns by solvers) and the local
//!   user's statistics (best, mean, rolling averages), kept in sync with
//!   every change.
//!
//! - **Event Store** - Decodes transport frames into events and applies them
//!   one at a time.
//!
//! - **Registration** - Validation of the registration form.
//!
//! # Design Principles
//!
//! 1. **Transitions are total** - Room transitions never fail; malformed data
//!    is tolerated and simply absent from derived views.
//!
//! 2. **Derived state is never set directly** - `me`, the table and the stats
//!    are recomputed by the transitions that affect them.
//!
//! 3. **No networking** - This crate is pure state, no WebSocket or HTTP.
//!
//! 4. **Serialization-ready** - All types can be converted to JSON for rendering.
//!
//! # Example
//!
//! ```rust
//! use multicubing_state::state::{Participant, RoomState, SolveTime};
//!
//! let mut room = RoomState::default();
//! room.enter_room("cube-room", "alice");
//! room.update_room(vec![Participant::new("alice")], vec![], vec![], None);
//! room.update_time(SolveTime::new("alice", 1, 9500));
//!
//! assert_eq!(room.table().row_count(), 1);
//! assert_eq!(room.stats().best, Some(9500));
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
