//! Chat rooms: participant membership and reply routing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bus::{MessageBus, Subscriber};
use crate::error::{RoomError, RoomResult};
use crate::message::Message;
use crate::naming;
use crate::participant::Participant;

/// Subscriber record binding one participant to one room.
///
/// Forwards every message addressed to the room and not sent by the
/// participant, then publishes the participant's reply on the same bus.
struct ParticipantRoute {
    room_id: String,
    participant: Arc<dyn Participant>,
}

#[async_trait]
impl Subscriber for ParticipantRoute {
    async fn on_message(&self, message: &Message, bus: &MessageBus) {
        let participant_id = self.participant.id();
        if message.room_id != self.room_id || message.is_from(participant_id) {
            return;
        }

        let reply = match self.participant.process_message(message).await {
            Ok(Some(reply)) => reply,
            Ok(None) => return,
            Err(err) => {
                warn!(
                    room_id = %self.room_id,
                    participant_id = %participant_id,
                    message_id = %message.id,
                    error = %err,
                    "Participant failed to reply, treating as no reply"
                );
                return;
            }
        };

        let reply = reply.readdressed(message.room_id.clone(), participant_id);
        debug!(
            room_id = %self.room_id,
            participant_id = %participant_id,
            in_reply_to = %message.id,
            reply_id = %reply.id,
            "Routing participant reply"
        );

        if let Err(err) = bus.publish(reply).await {
            warn!(
                room_id = %self.room_id,
                participant_id = %participant_id,
                error = %err,
                "Dropping reply published after the room closed"
            );
        }
    }
}

/// A conversation venue owning one bus and a participant table.
pub struct Room {
    id: String,
    name: String,
    description: String,
    bus: Arc<MessageBus>,
    participants: HashMap<String, Arc<dyn Participant>>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> RoomResult<Self> {
        Self::with_bus(name, Arc::new(MessageBus::new()))
    }

    /// Creates a room over an existing bus. The bus must not be shared with another room.
    pub fn with_bus(name: impl Into<String>, bus: Arc<MessageBus>) -> RoomResult<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        let id = Uuid::now_v7().to_string();
        info!(room_id = %id, name = %name, "Room created");
        Ok(Self {
            id,
            name,
            description: String::new(),
            bus,
            participants: HashMap::new(),
        })
    }

    fn validate_name(name: &str) -> RoomResult<()> {
        if name.trim().is_empty() {
            return Err(RoomError::EmptyName);
        }
        if !naming::is_alphanumeric(name) {
            return Err(RoomError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// The room's bus, for publishing the opening message or reading the transcript.
    pub fn bus(&self) -> Arc<MessageBus> {
        self.bus.clone()
    }

    pub fn participant_exists(&self, participant_id: &str) -> bool {
        self.participants.contains_key(participant_id)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.participants.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn participant(&self, participant_id: &str) -> Option<Arc<dyn Participant>> {
        self.participants.get(participant_id).cloned()
    }

    /// Seats a participant and starts routing room traffic to it.
    pub async fn add_participant(&mut self, participant: Arc<dyn Participant>) -> RoomResult<()> {
        let participant_id = participant.id().to_string();
        if self.participants.contains_key(&participant_id) {
            return Err(RoomError::DuplicateParticipant(participant_id));
        }

        let route = ParticipantRoute {
            room_id: self.id.clone(),
            participant: participant.clone(),
        };
        self.bus.subscribe(Arc::new(route)).await?;

        info!(
            room_id = %self.id,
            participant_id = %participant_id,
            participant_name = %participant.name(),
            "Participant joined room"
        );
        self.participants.insert(participant_id, participant);
        Ok(())
    }

    /// Ends the conversation. History stays readable through [`Room::bus`].
    pub async fn terminate(&self) {
        self.bus.terminate().await;
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("participants", &self.participant_ids())
            .finish_non_exhaustive()
    }
}
