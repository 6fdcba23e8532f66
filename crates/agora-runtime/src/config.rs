//! Caller-owned runtime configuration: credentials, endpoints and default models.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::models::{ModelProvider, ModelSpec};
use crate::providers::{anthropic, openai, AnthropicProvider, OpenAIProvider, DEFAULT_TIMEOUT};
use crate::{AIProvider, ProviderError};

pub const DEFAULT_AGENT_MODEL: &str = "openai:gpt-4o";
pub const DEFAULT_SIMULATION_MODEL: &str = "openai:gpt-4o-mini";

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    /// `provider:model` used by chat agents.
    pub agent_model: String,
    /// `provider:model` used for simulation housekeeping such as room descriptions.
    pub simulation_model: String,
    pub request_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: openai::DEFAULT_BASE_URL.to_string(),
            anthropic_api_key: None,
            anthropic_base_url: anthropic::DEFAULT_BASE_URL.to_string(),
            agent_model: DEFAULT_AGENT_MODEL.to_string(),
            simulation_model: DEFAULT_SIMULATION_MODEL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RuntimeConfig {
    /// Reads configuration from the process environment, keeping defaults for unset variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            openai_api_key: non_empty(OPENAI_API_KEY_VAR),
            openai_base_url: non_empty("OPENAI_API_BASE").unwrap_or(defaults.openai_base_url),
            anthropic_api_key: non_empty(ANTHROPIC_API_KEY_VAR),
            anthropic_base_url: non_empty("ANTHROPIC_API_BASE")
                .unwrap_or(defaults.anthropic_base_url),
            agent_model: non_empty("AGORA_AGENT_MODEL").unwrap_or(defaults.agent_model),
            simulation_model: non_empty("AGORA_SIMULATION_MODEL")
                .unwrap_or(defaults.simulation_model),
            request_timeout: defaults.request_timeout,
        }
    }

    pub fn with_agent_model(mut self, model: impl Into<String>) -> Self {
        self.agent_model = model.into();
        self
    }

    pub fn with_simulation_model(mut self, model: impl Into<String>) -> Self {
        self.simulation_model = model.into();
        self
    }

    pub fn agent_model_spec(&self) -> Result<ModelSpec, ProviderError> {
        ModelSpec::parse(&self.agent_model)
    }

    pub fn simulation_model_spec(&self) -> Result<ModelSpec, ProviderError> {
        ModelSpec::parse(&self.simulation_model)
    }

    /// Builds the HTTP provider serving `spec`, defaulting its model to `spec.model`.
    pub fn provider_for(&self, spec: &ModelSpec) -> Result<Arc<dyn AIProvider>, ProviderError> {
        debug!(model = %spec, "Building provider");
        let provider: Arc<dyn AIProvider> = match spec.provider {
            ModelProvider::OpenAI => {
                let api_key = self
                    .openai_api_key
                    .clone()
                    .ok_or(ProviderError::MissingApiKey(OPENAI_API_KEY_VAR))?;
                Arc::new(
                    OpenAIProvider::with_timeout(api_key, self.request_timeout)?
                        .with_base_url(&self.openai_base_url)
                        .with_default_model(&spec.model),
                )
            }
            ModelProvider::Anthropic => {
                let api_key = self
                    .anthropic_api_key
                    .clone()
                    .ok_or(ProviderError::MissingApiKey(ANTHROPIC_API_KEY_VAR))?;
                Arc::new(
                    AnthropicProvider::with_timeout(api_key, self.request_timeout)?
                        .with_base_url(&self.anthropic_base_url)
                        .with_default_model(&spec.model),
                )
            }
        };
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_use_openai_models() {
        let config = RuntimeConfig::default();
        assert_eq!(config.agent_model, "openai:gpt-4o");
        assert_eq!(config.simulation_model, "openai:gpt-4o-mini");
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ANTHROPIC_API_BASE", "http://localhost:9999"),
            ("AGORA_AGENT_MODEL", "anthropic:claude-3-5-haiku-latest"),
            ("AGORA_SIMULATION_MODEL", "  "),
        ]));

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.anthropic_base_url, "http://localhost:9999");
        assert_eq!(config.openai_base_url, openai::DEFAULT_BASE_URL);
        assert_eq!(config.agent_model, "anthropic:claude-3-5-haiku-latest");
        assert_eq!(config.simulation_model, DEFAULT_SIMULATION_MODEL);
    }

    #[test]
    fn model_specs_resolve_against_catalog() {
        let config = RuntimeConfig::default().with_agent_model("openai:not-a-model");
        assert!(config.agent_model_spec().is_err());
        assert_eq!(
            config.simulation_model_spec().unwrap().to_string(),
            DEFAULT_SIMULATION_MODEL
        );
    }

    #[test]
    fn missing_key_is_reported_per_provider() {
        let config = RuntimeConfig::default();

        let openai = ModelSpec::parse("openai:gpt-4o").unwrap();
        let anthropic = ModelSpec::parse("anthropic:claude-3-opus-latest").unwrap();

        assert_eq!(
            config.provider_for(&openai).err(),
            Some(ProviderError::MissingApiKey("OPENAI_API_KEY"))
        );
        assert_eq!(
            config.provider_for(&anthropic).err(),
            Some(ProviderError::MissingApiKey("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn builds_provider_when_key_present() {
        let config = RuntimeConfig {
            anthropic_api_key: Some("key".to_string()),
            ..RuntimeConfig::default()
        };
        let spec = ModelSpec::parse("anthropic:claude-3-opus-latest").unwrap();

        let provider = config.provider_for(&spec).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }
}
