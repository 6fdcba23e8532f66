//! Error types for the dispatch engine

use thiserror::Error;

/// Raised by any bus operation attempted after `terminate()`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("chat has been terminated")]
pub struct BusClosedError;

/// Room membership and construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("invalid room name: name cannot be blank")]
    EmptyName,

    #[error("invalid room name {0:?}: room name should be alphanumeric")]
    InvalidName(String),

    #[error("participant already exists in the room: {0}")]
    DuplicateParticipant(String),

    #[error(transparent)]
    BusClosed(#[from] BusClosedError),
}

/// Failure reported by a participant while producing a reply.
///
/// The room never propagates these; they are logged and treated as "no reply".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParticipantError {
    #[error("reply generation failed: {0}")]
    Generation(String),

    #[error("invalid reply: {0}")]
    InvalidReply(String),
}

/// Result type for room operations
pub type RoomResult<T> = Result<T, RoomError>;
