//! The capability a room needs from anything seated in it.

use async_trait::async_trait;

use crate::error::ParticipantError;
use crate::message::Message;

/// A conversation member: identity plus an optional reply to each message it sees.
///
/// A room never hands a participant its own messages. Returning `Ok(None)`
/// means "no reply"; an `Err` is logged by the room and treated the same way.
#[async_trait]
pub trait Participant: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    async fn process_message(&self, message: &Message) -> Result<Option<Message>, ParticipantError>;
}
