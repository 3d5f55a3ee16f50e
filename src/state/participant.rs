//! Room participants.
//!
//! Participants are kept in arrival order, which is also the column order of
//! the result table. The username is the key.

use serde::{Deserialize, Serialize};

/// Public account data of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: None,
            last_name: None,
        }
    }

    /// Full name when known, username otherwise.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }
}

/// A user present in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user: User,

    /// Spectators watch but have no column in the result table
    #[serde(default)]
    pub spectator: bool,
}

impl Participant {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            user: User::new(username),
            spectator: false,
        }
    }

    pub fn spectator(username: impl Into<String>) -> Self {
        Self {
            user: User::new(username),
            spectator: true,
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.user.username,
            "display_name": self.user.display_name(),
            "spectator": self.spectator
        })
    }
}

/// Ordered participant set keyed by username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParticipantList {
    participants: Vec<Participant>,
}

impl ParticipantList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any participant with the same username and move it to the end.
    pub fn upsert(&mut self, participant: Participant) {
        self.remove(participant.username());
        self.participants.push(participant);
    }

    /// Append only if the username is not known yet. Returns whether it was added.
    pub fn insert_new(&mut self, participant: Participant) -> bool {
        if self.contains(participant.username()) {
            return false;
        }
        self.participants.push(participant);
        true
    }

    pub fn remove(&mut self, username: &str) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.username() == username)?;
        Some(self.participants.remove(index))
    }

    pub fn get(&self, username: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.username() == username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.get(username).is_some()
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Non-spectators, in list order.
    pub fn solvers(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| !p.spectator)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
