//! Agora core - the message dispatch engine.
//!
//! This crate provides:
//! - `MessageBuilder` for assembling validated messages
//! - `MessageBus`, the ordered publish/subscribe primitive owned by a room
//! - `Room`, which seats participants and routes their replies back onto the bus

pub mod bus;
pub mod error;
pub mod message;
pub mod naming;
pub mod participant;
pub mod room;

pub use bus::{BusState, MessageBus, Subscriber};
pub use error::{BusClosedError, ParticipantError, RoomError, RoomResult};
pub use message::{Message, MessageBuilder, MessageKind, ValidationError};
pub use participant::Participant;
pub use room::Room;

pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::bus::{MessageBus, Subscriber};
    pub use crate::error::{BusClosedError, ParticipantError, RoomError, RoomResult};
    pub use crate::message::{Message, MessageBuilder, MessageKind, ValidationError};
    pub use crate::participant::Participant;
    pub use crate::room::Room;
}
