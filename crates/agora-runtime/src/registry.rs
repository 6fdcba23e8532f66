//! Provider registry.
//!
//! Named providers with a default, plus lazily built providers keyed by
//! `provider:model` so agents sharing a model share one HTTP client.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::RuntimeConfig;
use crate::models::ModelSpec;
use crate::{AIProvider, ProviderError};

pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn AIProvider>>>,
    default_provider: RwLock<Option<String>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
            default_provider: RwLock::new(None),
        }
    }

    /// Registers `provider` under `name`. The first registration becomes the default.
    pub async fn register(&self, name: impl Into<String>, provider: Arc<dyn AIProvider>) {
        let name = name.into();
        let mut providers = self.providers.write().await;

        if providers.is_empty() {
            *self.default_provider.write().await = Some(name.clone());
        }

        info!(name = %name, provider = provider.name(), "Provider registered");
        providers.insert(name, provider);
    }

    pub async fn get(&self, name: &str) -> Option<Arc<dyn AIProvider>> {
        self.providers.read().await.get(name).cloned()
    }

    pub async fn get_default(&self) -> Option<Arc<dyn AIProvider>> {
        let default = self.default_provider.read().await.clone();
        match default {
            Some(name) => self.get(&name).await,
            None => None,
        }
    }

    pub async fn set_default(&self, name: &str) -> Result<(), ProviderError> {
        let providers = self.providers.read().await;
        if !providers.contains_key(name) {
            return Err(ProviderError::Message(format!("Provider '{name}' not found")));
        }

        *self.default_provider.write().await = Some(name.to_string());
        Ok(())
    }

    /// Registered names, sorted.
    pub async fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the provider registered for `spec`, building it from `config` on first use.
    pub async fn get_or_build(
        &self,
        config: &RuntimeConfig,
        spec: &ModelSpec,
    ) -> Result<Arc<dyn AIProvider>, ProviderError> {
        let key = spec.to_string();
        if let Some(provider) = self.get(&key).await {
            return Ok(provider);
        }

        let provider = config.provider_for(spec)?;
        let mut providers = self.providers.write().await;
        let provider = providers.entry(key.clone()).or_insert(provider).clone();
        drop(providers);

        let mut default = self.default_provider.write().await;
        if default.is_none() {
            *default = Some(key);
        }
        Ok(provider)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;

    #[tokio::test]
    async fn register_and_get_provider() {
        let registry = ProviderRegistry::new();
        registry.register("test", Arc::new(MockProvider::new())).await;

        let retrieved = registry.get("test").await;
        assert_eq!(retrieved.unwrap().name(), "mock");
        assert!(registry.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn first_registration_is_default() {
        let registry = ProviderRegistry::new();
        assert!(registry.get_default().await.is_none());

        let first: Arc<dyn AIProvider> = Arc::new(MockProvider::new());
        registry.register("p1", first.clone()).await;
        registry.register("p2", Arc::new(MockProvider::new())).await;

        let default = registry.get_default().await.unwrap();
        assert!(Arc::ptr_eq(&default, &first));

        registry.set_default("p2").await.unwrap();
        let default = registry.get_default().await.unwrap();
        assert!(!Arc::ptr_eq(&default, &first));
    }

    #[tokio::test]
    async fn list_is_sorted() {
        let registry = ProviderRegistry::new();
        registry.register("p2", Arc::new(MockProvider::new())).await;
        registry.register("p1", Arc::new(MockProvider::new())).await;

        assert_eq!(registry.list().await, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn set_default_nonexistent_fails() {
        let registry = ProviderRegistry::new();

        let err = registry.set_default("nonexistent").await.unwrap_err();
        match err {
            ProviderError::Message(msg) => assert!(msg.contains("nonexistent")),
            other => panic!("expected Message error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_or_build_prefers_registered_provider() {
        let registry = ProviderRegistry::new();
        let mock: Arc<dyn AIProvider> = Arc::new(MockProvider::new());
        registry.register("openai:gpt-4o", mock.clone()).await;

        let spec = ModelSpec::parse("openai:gpt-4o").unwrap();
        let resolved = registry
            .get_or_build(&RuntimeConfig::default(), &spec)
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&resolved, &mock));
    }

    #[tokio::test]
    async fn get_or_build_caches_built_provider() {
        let registry = ProviderRegistry::new();
        let config = RuntimeConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..RuntimeConfig::default()
        };
        let spec = ModelSpec::parse("openai:gpt-4o-mini").unwrap();

        let first = registry.get_or_build(&config, &spec).await.unwrap();
        let second = registry.get_or_build(&config, &spec).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.list().await, vec!["openai:gpt-4o-mini"]);
        assert_eq!(registry.get_default().await.unwrap().name(), "openai");
    }

    #[tokio::test]
    async fn get_or_build_surfaces_missing_key() {
        let registry = ProviderRegistry::new();
        let spec = ModelSpec::parse("anthropic:claude-3-opus-latest").unwrap();

        let err = registry
            .get_or_build(&RuntimeConfig::default(), &spec)
            .await
            .err()
            .unwrap();

        assert_eq!(err, ProviderError::MissingApiKey("ANTHROPIC_API_KEY"));
        assert!(registry.list().await.is_empty());
    }
}
