//! Room store.
//!
//! Owns the single [`RoomState`] of the application. Events are applied one
//! at a time in submission order; readers only ever see a state with every
//! derived view up to date.

use super::config::RoomConfig;
use super::event::{EventError, RoomEvent};
use super::room::RoomState;

#[derive(Debug, Default)]
pub struct RoomStore {
    state: RoomState,

    /// Number of events applied so far
    revision: u64,
}

impl RoomStore {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            state: RoomState::new(config),
            revision: 0,
        }
    }

    pub fn dispatch(&mut self, event: RoomEvent) -> &RoomState {
        tracing::debug!(
            event = event.name(),
            local = event.is_local(),
            revision = self.revision + 1,
            room = self.state.room_slug().unwrap_or("-"),
            "Applying room event"
        );
        self.state.apply_mut(event);
        self.revision += 1;
        &self.state
    }

    /// Decode a transport frame and apply it. Malformed frames leave the
    /// state untouched.
    pub fn dispatch_json(&mut self, frame: &str) -> Result<&RoomState, EventError> {
        let event = RoomEvent::from_json(frame).map_err(|err| {
            tracing::warn!(%err, "Dropping malformed room event");
            err
        })?;
        Ok(self.dispatch(event))
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &RoomConfig {
        self.state.config()
    }
}
