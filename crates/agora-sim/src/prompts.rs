//! Prompt text sent to model providers.

use crate::persona::Persona;

pub const AGENT_INSTRUCTIONS: &str = "You are an AI chat agent, given a message, reply to it.";

/// System prompt for an agent speaking as `persona`.
pub fn agent_system(persona: &Persona) -> String {
    format!(
        "{AGENT_INSTRUCTIONS}\nYou are {name}. {description}\nStay in character and respond with the reply text only.",
        name = persona.name,
        description = persona.description,
    )
}

/// Asks for a 2 to 5 line description of a simulation seeded with `prompt`.
pub fn room_description(prompt: &str) -> String {
    format!(
        "Generate a short description for a chatroom simulation where AI agents talk to each other.\n\
         I will give you the 'prompt' for the simulation which briefly describes the simulation.\n\
         Give a 2 to 5 line description of the simulation.\n\
         Respond only with the description and do not include anything else.\n\
         Prompt: {prompt}"
    )
}
