//! Chat simulations: rooms of persona-driven agents seeded with a prompt.

use std::sync::Arc;

use agora_core::{
    naming, BusClosedError, Message, MessageBuilder, Participant, Room, RoomError, ValidationError,
};
use agora_runtime::config::DEFAULT_AGENT_MODEL;
use agora_runtime::{
    AIProvider, GenerateRequest, ModelSpec, ProviderError, ProviderRegistry, RuntimeConfig,
};
use futures::future::try_join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::agent::ChatAgent;
use crate::persona;
use crate::prompts;
use crate::validator::AgentError;

pub const DEFAULT_AGENT_COUNT: usize = 3;

/// Sender id used for the opening prompt.
pub const PROMPT_SENDER: &str = "user";

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation name {0:?}")]
    InvalidName(String),

    #[error("unable to create {requested} agents with unique personas, only {available} available")]
    NotEnoughPersonas { requested: usize, available: usize },

    #[error("simulation has no rooms, call setup with a prompt first")]
    NotSetUp,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Message(#[from] ValidationError),
}

impl From<BusClosedError> for SimulationError {
    fn from(err: BusClosedError) -> Self {
        Self::Room(RoomError::BusClosed(err))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    pub prompt: Option<String>,
    /// Defaults to [`DEFAULT_AGENT_COUNT`].
    pub agent_count: Option<usize>,
    /// Per-agent reply budget. `None` lets agents reply until the provider stops answering.
    pub max_replies: Option<usize>,
}

impl SimulationOptions {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    pub fn agent_count(mut self, agent_count: usize) -> Self {
        self.agent_count = Some(agent_count);
        self
    }

    pub fn max_replies(mut self, max_replies: usize) -> Self {
        self.max_replies = Some(max_replies);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptParticipant {
    pub id: String,
    pub name: String,
    pub persona: String,
}

/// Everything said in one room, in publication order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub room_id: String,
    pub room_name: String,
    pub description: String,
    pub participants: Vec<TranscriptParticipant>,
    pub messages: Vec<Message>,
}

impl Transcript {
    /// Display name for a sender id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, sender: &'a str) -> &'a str {
        self.participants
            .iter()
            .find(|participant| participant.id == sender)
            .map_or(sender, |participant| participant.name.as_str())
    }
}

struct SimulatedRoom {
    room: Room,
    prompt: String,
    agents: Vec<Arc<ChatAgent>>,
}

pub struct ChatSimulation {
    id: String,
    name: String,
    provider: Arc<dyn AIProvider>,
    agent_provider: Arc<dyn AIProvider>,
    agent_model: ModelSpec,
    rooms: Vec<SimulatedRoom>,
}

impl ChatSimulation {
    /// Creates a simulation whose agents and housekeeping share `provider`.
    ///
    /// A missing name is replaced with a random one; a given name must pass
    /// [`naming::is_valid_name`].
    pub fn new(name: Option<String>, provider: Arc<dyn AIProvider>) -> Result<Self, SimulationError> {
        let name = name.unwrap_or_else(naming::random_name);
        if !naming::is_valid_name(&name) {
            return Err(SimulationError::InvalidName(name));
        }

        let id = Uuid::new_v4().to_string();
        info!(simulation_id = %id, name = %name, "Simulation created");
        Ok(Self {
            id,
            name,
            agent_provider: provider.clone(),
            provider,
            agent_model: ModelSpec::parse(DEFAULT_AGENT_MODEL)?,
            rooms: Vec::new(),
        })
    }

    /// Resolves both configured models through `registry`.
    pub async fn from_config(
        name: Option<String>,
        config: &RuntimeConfig,
        registry: &ProviderRegistry,
    ) -> Result<Self, SimulationError> {
        let simulation_model = config.simulation_model_spec()?;
        let agent_model = config.agent_model_spec()?;

        let provider = registry.get_or_build(config, &simulation_model).await?;
        let agent_provider = registry.get_or_build(config, &agent_model).await?;

        Ok(Self::new(name, provider)?.with_agent_provider(agent_provider, agent_model))
    }

    pub fn with_agent_provider(mut self, provider: Arc<dyn AIProvider>, model: ModelSpec) -> Self {
        self.agent_provider = provider;
        self.agent_model = model;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agent_model(&self) -> &ModelSpec {
        &self.agent_model
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().map(|entry| &entry.room)
    }

    pub fn agents(&self, room_id: &str) -> Option<&[Arc<ChatAgent>]> {
        self.rooms
            .iter()
            .find(|entry| entry.room.id() == room_id)
            .map(|entry| entry.agents.as_slice())
    }

    /// Builds a room for `options.prompt` and seats its agents.
    ///
    /// Returns `Ok(false)` without touching state when no prompt is given.
    pub async fn setup(&mut self, options: SimulationOptions) -> Result<bool, SimulationError> {
        let Some(prompt) = options.prompt.filter(|prompt| !prompt.trim().is_empty()) else {
            return Ok(false);
        };

        let agent_count = options.agent_count.unwrap_or(DEFAULT_AGENT_COUNT);
        let personas = persona::sample(agent_count).ok_or(SimulationError::NotEnoughPersonas {
            requested: agent_count,
            available: persona::catalog_len(),
        })?;

        let mut room = Room::new(naming::random_name())?;
        room.set_description(self.describe(&prompt).await);

        let mut agents = Vec::with_capacity(personas.len());
        for persona in personas {
            let agent = ChatAgent::new(
                persona.name.clone(),
                persona,
                self.agent_model.clone(),
                self.agent_provider.clone(),
            )?
            .with_max_replies(options.max_replies);
            let agent = Arc::new(agent);
            room.add_participant(agent.clone()).await?;
            agents.push(agent);
        }

        info!(
            simulation_id = %self.id,
            room_id = %room.id(),
            room_name = %room.name(),
            agents = agents.len(),
            "Simulation room ready"
        );
        self.rooms.push(SimulatedRoom {
            room,
            prompt,
            agents,
        });
        Ok(true)
    }

    async fn describe(&self, prompt: &str) -> String {
        let request = GenerateRequest::new(prompts::room_description(prompt));
        match self.provider.generate(request).await {
            Ok(response) => response.content.trim().to_string(),
            Err(err) => {
                warn!(simulation_id = %self.id, error = %err, "Room description failed, leaving it empty");
                String::new()
            }
        }
    }

    /// Seeds every room with its prompt, waits for the conversation to settle,
    /// then closes the room. Rooms run concurrently.
    pub async fn simulate(&self) -> Result<Vec<Transcript>, SimulationError> {
        if self.rooms.is_empty() {
            return Err(SimulationError::NotSetUp);
        }

        try_join_all(self.rooms.iter().map(|entry| self.run_room(entry))).await
    }

    async fn run_room(&self, entry: &SimulatedRoom) -> Result<Transcript, SimulationError> {
        let room = &entry.room;
        let seed = MessageBuilder::user_message(room.id(), entry.prompt.as_str(), PROMPT_SENDER)?;

        info!(simulation_id = %self.id, room_id = %room.id(), "Simulation started");
        room.bus().publish(seed).await?;
        room.terminate().await;

        let messages = room.bus().history().await;
        info!(
            simulation_id = %self.id,
            room_id = %room.id(),
            messages = messages.len(),
            "Simulation finished"
        );

        Ok(Transcript {
            room_id: room.id().to_string(),
            room_name: room.name().to_string(),
            description: room.description().to_string(),
            participants: entry
                .agents
                .iter()
                .map(|agent| TranscriptParticipant {
                    id: agent.id().to_string(),
                    name: agent.name().to_string(),
                    persona: agent.persona().key.clone(),
                })
                .collect(),
            messages,
        })
    }
}

impl std::fmt::Debug for ChatSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSimulation")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("agent_model", &self.agent_model)
            .field("rooms", &self.rooms.len())
            .finish_non_exhaustive()
    }
}
