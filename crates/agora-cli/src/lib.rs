//! Command surface of the `agora` binary.

use agora_runtime::{
    ModelCatalog, ModelProvider, ModelSpec, ProviderError, ProviderRegistry, RuntimeConfig,
};
use agora_sim::{
    persona, ChatSimulation, SimulationError, SimulationOptions, Transcript, DEFAULT_AGENT_COUNT,
};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_MAX_REPLIES: usize = 3;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "agora",
    version,
    about = "Agora chatroom simulations",
    long_about = "Seat AI agents with distinct personas in a chatroom, seed the conversation with a prompt and print the transcript"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Run a chat simulation seeded with a prompt")]
    Simulate(SimulateArgs),
    #[command(about = "List built-in agent personas")]
    Personas,
    #[command(about = "List supported provider:model ids")]
    Models {
        #[arg(long, help = "Only list models for this provider (openai or anthropic)")]
        provider: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    #[arg(short, long, help = "Opening message for the conversation")]
    pub prompt: String,
    #[arg(short, long, default_value_t = DEFAULT_AGENT_COUNT, help = "Number of agents to seat")]
    pub agents: usize,
    #[arg(long, env = "AGORA_AGENT_MODEL", help = "Agent model as provider:model")]
    pub model: Option<String>,
    #[arg(
        long,
        env = "AGORA_SIMULATION_MODEL",
        help = "Model used for the room description, as provider:model"
    )]
    pub simulation_model: Option<String>,
    #[arg(long, default_value_t = DEFAULT_MAX_REPLIES, help = "Replies each agent may send")]
    pub max_replies: usize,
    #[arg(long, help = "Simulation name (random when omitted)")]
    pub name: Option<String>,
    #[arg(long, help = "Print transcripts as JSON")]
    pub json: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("json encode error: {0}")]
    Encode(String),
}

/// What a command produced. Rendering is left to the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Text(String),
    Transcripts(Vec<Transcript>),
}

pub async fn run(cli: Cli) -> Result<Output, CliError> {
    match cli.command {
        Commands::Simulate(args) => {
            let config = runtime_config(&args, RuntimeConfig::from_env())?;
            let registry = ProviderRegistry::new();
            let simulation = ChatSimulation::from_config(args.name.clone(), &config, &registry).await?;
            let transcripts = run_simulation(&args, simulation).await?;

            if args.json {
                let json = serde_json::to_string_pretty(&transcripts)
                    .map_err(|err| CliError::Encode(err.to_string()))?;
                Ok(Output::Text(json))
            } else {
                Ok(Output::Transcripts(transcripts))
            }
        }
        Commands::Personas => Ok(Output::Text(list_personas())),
        Commands::Models { provider } => list_models(provider.as_deref()).map(Output::Text),
    }
}

/// Applies model flags on top of `base`, validating both specs up front.
pub fn runtime_config(args: &SimulateArgs, base: RuntimeConfig) -> Result<RuntimeConfig, CliError> {
    let mut config = base;
    if let Some(model) = &args.model {
        config = config.with_agent_model(model.clone());
    }
    if let Some(model) = &args.simulation_model {
        config = config.with_simulation_model(model.clone());
    }

    config.agent_model_spec()?;
    config.simulation_model_spec()?;
    Ok(config)
}

pub async fn run_simulation(
    args: &SimulateArgs,
    mut simulation: ChatSimulation,
) -> Result<Vec<Transcript>, CliError> {
    if args.max_replies == 0 {
        return Err(CliError::InvalidArgument(
            "max replies must be at least 1".to_string(),
        ));
    }

    let options = SimulationOptions::with_prompt(args.prompt.clone())
        .agent_count(args.agents)
        .max_replies(args.max_replies);
    if !simulation.setup(options).await? {
        return Err(CliError::InvalidArgument("prompt cannot be empty".to_string()));
    }

    info!(simulation = %simulation.name(), model = %simulation.agent_model(), "Running simulation");
    Ok(simulation.simulate().await?)
}

pub fn list_personas() -> String {
    persona::catalog()
        .iter()
        .map(|persona| format!("{:<18} {:<18} {}", persona.key, persona.name, persona.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn list_models(provider: Option<&str>) -> Result<String, CliError> {
    let models = match provider {
        Some(name) => {
            let provider: ModelProvider = name
                .parse()
                .map_err(|_| CliError::InvalidArgument(format!("unknown provider `{name}`")))?;
            ModelCatalog::models(provider)
                .iter()
                .map(|model| {
                    ModelSpec {
                        provider,
                        model: (*model).to_string(),
                    }
                    .to_string()
                })
                .collect()
        }
        None => ModelCatalog::all(),
    };
    Ok(models.join("\n"))
}
