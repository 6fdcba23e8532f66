//! Agent and persona validation.

use agora_core::naming;
use thiserror::Error;

use crate::persona::Persona;

pub const PERSONA_DESCRIPTION_MAX_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("invalid agent name {0:?}")]
    InvalidName(String),

    #[error("invalid persona name {0:?}")]
    InvalidPersonaName(String),

    #[error("persona description should be at most {max} characters, got {len}")]
    DescriptionTooLong { len: usize, max: usize },
}

/// Checks the agent name, then the persona name, then the persona description length.
pub fn validate_agent(name: &str, persona: &Persona) -> Result<(), AgentError> {
    if !naming::is_valid_name(name) {
        return Err(AgentError::InvalidName(name.to_string()));
    }
    if !naming::is_valid_name(&persona.name) {
        return Err(AgentError::InvalidPersonaName(persona.name.clone()));
    }

    let len = persona.description.chars().count();
    if len > PERSONA_DESCRIPTION_MAX_LENGTH {
        return Err(AgentError::DescriptionTooLong {
            len,
            max: PERSONA_DESCRIPTION_MAX_LENGTH,
        });
    }
    Ok(())
}
