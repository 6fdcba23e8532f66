//! Runtime abstractions for AI providers.

pub mod config;
pub mod models;
pub mod providers;
pub mod registry;

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::RuntimeConfig;
pub use models::{ModelCatalog, ModelProvider, ModelSpec};
pub use providers::{AnthropicProvider, OpenAIProvider};
pub use registry::ProviderRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub metadata: Option<serde_json::Value>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            model: None,
            max_tokens: None,
            temperature: None,
            metadata: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub content: String,
    pub model: Option<String>,
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
            finish_reason: Some("stop".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamChunk {
    Delta { text: String },
    Done,
}

pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, ProviderError>> + Send>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("mock provider has no queued response")]
    MockQueueEmpty,
    #[error("provider error: {0}")]
    Message(String),
    #[error("http transport error: {0}")]
    Transport(String),
    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("response decode error: {0}")]
    Decode(String),
    #[error("stream error: {0}")]
    Stream(String),
    #[error("model {0} not found")]
    UnknownModel(String),
    #[error("{0} environment variable must be set")]
    MissingApiKey(&'static str),
}

#[async_trait]
pub trait AIProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, ProviderError>;

    async fn generate_stream(&self, req: GenerateRequest) -> Result<ProviderStream, ProviderError>;
}

/// Provider that replays queued results and records every request it receives.
#[derive(Debug, Default)]
pub struct MockProvider {
    generate_queue: Mutex<VecDeque<Result<GenerateResponse, ProviderError>>>,
    stream_queue: Mutex<VecDeque<Result<Vec<StreamChunk>, ProviderError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_generate(&self, result: Result<GenerateResponse, ProviderError>) {
        self.generate_queue
            .lock()
            .expect("mock generate queue poisoned")
            .push_back(result);
    }

    /// Queues one successful text response per entry.
    pub fn enqueue_texts<I, S>(&self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for text in texts {
            self.enqueue_generate(Ok(GenerateResponse::text(text)));
        }
    }

    pub fn enqueue_stream(&self, result: Result<Vec<StreamChunk>, ProviderError>) {
        self.stream_queue
            .lock()
            .expect("mock stream queue poisoned")
            .push_back(result);
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .clone()
    }

    fn record(&self, req: GenerateRequest) {
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(req);
    }
}

#[async_trait]
impl AIProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.record(req);
        self.generate_queue
            .lock()
            .expect("mock generate queue poisoned")
            .pop_front()
            .unwrap_or(Err(ProviderError::MockQueueEmpty))
    }

    async fn generate_stream(&self, req: GenerateRequest) -> Result<ProviderStream, ProviderError> {
        self.record(req);
        let next = self
            .stream_queue
            .lock()
            .expect("mock stream queue poisoned")
            .pop_front()
            .unwrap_or(Err(ProviderError::MockQueueEmpty))?;

        Ok(Box::pin(stream::iter(next.into_iter().map(Ok))))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::{
        AIProvider, GenerateRequest, GenerateResponse, MockProvider, ProviderError, StreamChunk,
    };

    fn request() -> GenerateRequest {
        GenerateRequest::new("hello")
            .with_model("mock-1")
            .with_max_tokens(64)
            .with_temperature(0.0)
    }

    #[tokio::test]
    async fn mock_generate_returns_queued_response() {
        let provider = MockProvider::new();
        provider.enqueue_generate(Ok(GenerateResponse {
            content: "hello from mock".to_string(),
            model: Some("mock-1".to_string()),
            finish_reason: Some("stop".to_string()),
        }));

        let response = provider.generate(request()).await.unwrap();

        assert_eq!(response.content, "hello from mock");
        assert_eq!(response.model.as_deref(), Some("mock-1"));
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn mock_records_requests_in_order() {
        let provider = MockProvider::new();
        provider.enqueue_texts(["one", "two"]);

        provider
            .generate(GenerateRequest::new("first").with_system("be brief"))
            .await
            .unwrap();
        provider.generate(GenerateRequest::new("second")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].prompt, "first");
        assert_eq!(requests[0].system.as_deref(), Some("be brief"));
        assert_eq!(requests[1].prompt, "second");
        assert_eq!(requests[1].system, None);
    }

    #[tokio::test]
    async fn mock_generate_stream_emits_chunks_in_order() {
        let provider = MockProvider::new();
        provider.enqueue_stream(Ok(vec![
            StreamChunk::Delta {
                text: "hello".to_string(),
            },
            StreamChunk::Delta {
                text: " ".to_string(),
            },
            StreamChunk::Done,
        ]));

        let mut stream = provider.generate_stream(request()).await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        let third = stream.next().await.unwrap().unwrap();
        let end = stream.next().await;

        assert_eq!(
            first,
            StreamChunk::Delta {
                text: "hello".to_string()
            }
        );
        assert_eq!(
            second,
            StreamChunk::Delta {
                text: " ".to_string()
            }
        );
        assert_eq!(third, StreamChunk::Done);
        assert!(end.is_none());
    }

    #[tokio::test]
    async fn mock_reports_empty_queue_error() {
        let provider = MockProvider::new();

        let err = provider.generate(request()).await.unwrap_err();

        assert_eq!(err, ProviderError::MockQueueEmpty);
    }

    #[tokio::test]
    async fn mock_stream_reports_queued_error() {
        let provider = MockProvider::new();
        provider.enqueue_stream(Err(ProviderError::Message("upstream timeout".to_string())));

        let err = provider
            .generate_stream(request())
            .await
            .err()
            .expect("queued stream error should surface");

        assert_eq!(err, ProviderError::Message("upstream timeout".to_string()));
    }
}
