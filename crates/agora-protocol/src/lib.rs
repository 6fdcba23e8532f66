//! Agora protocol types and validation logic.
//!
//! This crate implements:
//! - the chat message envelope (`Message`) exchanged inside a room
//! - message kinds (`MessageKind`)
//! - the validation errors raised when a message is incomplete

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sender marker used for messages injected by the system rather than a participant.
pub const SYSTEM_SENDER: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    System,
    Agent,
    User,
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::System => "system",
            MessageKind::Agent => "agent",
            MessageKind::User => "user",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(MessageKind::System),
            "agent" => Ok(MessageKind::Agent),
            "user" => Ok(MessageKind::User),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// Reasons a message cannot be constructed.
///
/// Required fields are checked in declaration order and the first violation wins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("id required")]
    MissingId,
    #[error("roomId required")]
    MissingRoomId,
    #[error("sender required")]
    MissingSender,
    #[error("body required")]
    MissingBody,
    #[error("kind required")]
    MissingKind,
    #[error("unknown message kind {0:?}")]
    UnknownKind(String),
}

/// A single chat message. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub room_id: String,
    pub sender: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub kind: MessageKind,
}

fn default_visible() -> bool {
    true
}

impl Message {
    /// Checks the envelope invariants for messages that did not come from a builder,
    /// for example ones decoded from JSON.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        if self.room_id.is_empty() {
            return Err(ValidationError::MissingRoomId);
        }
        if self.sender.is_empty() {
            return Err(ValidationError::MissingSender);
        }
        if self.body.is_empty() {
            return Err(ValidationError::MissingBody);
        }
        Ok(())
    }

    /// Returns the same message addressed to `room_id` and attributed to `sender`.
    pub fn readdressed(self, room_id: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            sender: sender.into(),
            ..self
        }
    }

    pub fn is_from(&self, sender: &str) -> bool {
        self.sender == sender
    }

    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }
}
