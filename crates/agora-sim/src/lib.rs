//! Agora simulations.
//!
//! Seats persona-driven [`ChatAgent`]s in a room, seeds the conversation with a
//! prompt and collects the resulting transcript.

pub mod agent;
pub mod persona;
pub mod prompts;
pub mod simulation;
pub mod validator;

pub use agent::ChatAgent;
pub use persona::Persona;
pub use simulation::{
    ChatSimulation, SimulationError, SimulationOptions, Transcript, TranscriptParticipant,
    DEFAULT_AGENT_COUNT,
};
pub use validator::{validate_agent, AgentError};
