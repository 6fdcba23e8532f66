//! Model resolution: `provider:model` specs checked against known catalogs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProviderError;

const OPENAI_MODELS: &[&str] = &[
    "o1",
    "o1-2024-12-17",
    "o1-mini",
    "o1-mini-2024-09-12",
    "o1-preview",
    "o1-preview-2024-09-12",
    "gpt-4o",
    "gpt-4o-2024-05-13",
    "gpt-4o-2024-08-06",
    "gpt-4o-2024-11-20",
    "gpt-4o-audio-preview",
    "gpt-4o-audio-preview-2024-10-01",
    "gpt-4o-audio-preview-2024-12-17",
    "gpt-4o-mini",
    "gpt-4o-mini-2024-07-18",
    "gpt-4-turbo",
    "gpt-4-turbo-2024-04-09",
    "gpt-4-turbo-preview",
    "gpt-4-0125-preview",
    "gpt-4-1106-preview",
    "gpt-4",
    "gpt-4-0613",
    "gpt-3.5-turbo-0125",
    "gpt-3.5-turbo",
    "gpt-3.5-turbo-1106",
];

const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-sonnet-latest",
    "claude-3-5-sonnet-20241022",
    "claude-3-5-sonnet-20240620",
    "claude-3-5-haiku-latest",
    "claude-3-5-haiku-20241022",
    "claude-3-opus-latest",
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    OpenAI,
    Anthropic,
}

impl ModelProvider {
    pub const ALL: [ModelProvider; 2] = [ModelProvider::OpenAI, ModelProvider::Anthropic];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelProvider::OpenAI => "openai",
            ModelProvider::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "openai" => Ok(ModelProvider::OpenAI),
            "anthropic" => Ok(ModelProvider::Anthropic),
            other => Err(ProviderError::UnknownModel(other.to_string())),
        }
    }
}

/// Known model ids per provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelCatalog;

impl ModelCatalog {
    pub fn models(provider: ModelProvider) -> &'static [&'static str] {
        match provider {
            ModelProvider::OpenAI => OPENAI_MODELS,
            ModelProvider::Anthropic => ANTHROPIC_MODELS,
        }
    }

    pub fn contains(provider: ModelProvider, model: &str) -> bool {
        Self::models(provider).contains(&model)
    }

    /// Every known model as a `provider:model` string, providers in declaration order.
    pub fn all() -> Vec<String> {
        ModelProvider::ALL
            .iter()
            .flat_map(|provider| {
                Self::models(*provider)
                    .iter()
                    .map(move |model| format!("{provider}:{model}"))
            })
            .collect()
    }
}

/// A resolved `provider:model` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub provider: ModelProvider,
    pub model: String,
}

impl ModelSpec {
    /// Parses `provider:model`, rejecting providers and models outside the catalog.
    pub fn parse(value: &str) -> Result<Self, ProviderError> {
        let unknown = || ProviderError::UnknownModel(value.to_string());

        let (provider, model) = value.split_once(':').ok_or_else(unknown)?;
        let provider: ModelProvider = provider.parse().map_err(|_| unknown())?;
        if !ModelCatalog::contains(provider, model) {
            return Err(unknown());
        }

        Ok(Self {
            provider,
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

impl FromStr for ModelSpec {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}
