//! Room chat.

use serde::{Deserialize, Serialize};

use super::participant::User;

/// A chat message. The id is assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,

    #[serde(default)]
    pub author: Option<User>,

    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Message {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            author: None,
            created_at: None,
        }
    }

    pub fn with_author(mut self, author: User) -> Self {
        self.author = Some(author);
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "text": self.text,
            "author": self.author.as_ref().map(|a| a.username.as_str()),
            "created_at": self.created_at.map(|t| t.to_rfc3339())
        })
    }
}

/// Chat history keyed by message id, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a message with the same id; the new copy becomes the newest.
    pub fn upsert(&mut self, message: Message) {
        self.remove(message.id);
        self.messages.push(message);
    }

    /// Append only if the id is unknown. Returns whether it was added.
    pub fn insert_new(&mut self, message: Message) -> bool {
        if self.contains(message.id) {
            return false;
        }
        self.messages.push(message);
        true
    }

    pub fn remove(&mut self, id: u64) -> Option<Message> {
        let index = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(index))
    }

    pub fn get(&self, id: u64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
