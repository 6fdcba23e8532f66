//! Message construction for Agora rooms.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

pub use agora_protocol::{Message, MessageKind, ValidationError, SYSTEM_SENDER};

/// Fluent assembler for a single [`Message`].
///
/// Every setter moves the builder through the chain and `build` consumes it,
/// so one builder yields at most one message.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    id: Option<String>,
    room_id: String,
    sender: String,
    body: String,
    timestamp: Option<DateTime<Utc>>,
    visible: Option<bool>,
    kind: Option<MessageKind>,
}

impl MessageBuilder {
    /// Empty builder; every field is unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the generated id. An empty id is ignored.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Room the message belongs to. Required.
    pub fn with_room_id(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = room_id.into();
        self
    }

    /// Participant id or system marker. Required.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Text payload. Required.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Creation instant; defaults to now.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether observers should surface the message.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Message kind. Required.
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Validates the collected fields and produces the message.
    ///
    /// Missing id and timestamp are generated. Required fields are checked in
    /// the order room id, sender, body, kind.
    pub fn build(self) -> Result<Message, ValidationError> {
        if self.room_id.is_empty() {
            return Err(ValidationError::MissingRoomId);
        }
        if self.sender.is_empty() {
            return Err(ValidationError::MissingSender);
        }
        if self.body.is_empty() {
            return Err(ValidationError::MissingBody);
        }
        let kind = self.kind.ok_or(ValidationError::MissingKind)?;

        let visible = match self.visible {
            Some(visible) => visible,
            None => {
                warn!(
                    room_id = %self.room_id,
                    sender = %self.sender,
                    "message visibility not explicitly set, defaulting to visible"
                );
                true
            }
        };

        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::now_v7().to_string(),
        };

        Ok(Message {
            id,
            room_id: self.room_id,
            sender: self.sender,
            body: self.body,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            visible,
            kind,
        })
    }

    /// Visible agent message.
    pub fn build_agent(self) -> Result<Message, ValidationError> {
        self.with_visible(true).with_kind(MessageKind::Agent).build()
    }

    /// System message, visible unless set otherwise.
    pub fn build_system(self) -> Result<Message, ValidationError> {
        let visible = self.visible.unwrap_or(true);
        self.with_visible(visible).with_kind(MessageKind::System).build()
    }

    /// Visible user message.
    pub fn build_user(self) -> Result<Message, ValidationError> {
        self.with_visible(true).with_kind(MessageKind::User).build()
    }

    /// System message that observers should not surface.
    pub fn build_hidden_system(self) -> Result<Message, ValidationError> {
        self.with_visible(false).with_kind(MessageKind::System).build()
    }

    /// Builds a visible agent message in one call.
    pub fn agent_message(
        room_id: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Result<Message, ValidationError> {
        Self::addressed(room_id, body, sender).build_agent()
    }

    /// Builds a visible system message in one call.
    pub fn system_message(
        room_id: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Result<Message, ValidationError> {
        Self::addressed(room_id, body, sender).build_system()
    }

    /// Builds a visible user message in one call.
    pub fn user_message(
        room_id: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Result<Message, ValidationError> {
        Self::addressed(room_id, body, sender).build_user()
    }

    /// Builds a hidden system message in one call.
    pub fn hidden_system_message(
        room_id: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Result<Message, ValidationError> {
        Self::addressed(room_id, body, sender).build_hidden_system()
    }

    fn addressed(
        room_id: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self::new()
            .with_room_id(room_id)
            .with_sender(sender)
            .with_body(body)
    }
}
