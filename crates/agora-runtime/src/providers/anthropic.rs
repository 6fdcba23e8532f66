//! Anthropic Messages API provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_eventsource::RequestBuilderExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, pump_events, SseFrame, DEFAULT_TIMEOUT};
use crate::{AIProvider, GenerateRequest, GenerateResponse, ProviderError, ProviderStream};

const MESSAGES_PATH: &str = "/v1/messages";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), MESSAGES_PATH)
    }

    fn payload(&self, req: GenerateRequest, stream: bool) -> MessagesRequest {
        MessagesRequest {
            model: req.model.unwrap_or_else(|| self.default_model.clone()),
            max_tokens: req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: req.system,
            temperature: req.temperature,
            stream,
            messages: vec![InputMessage {
                role: "user",
                content: req.prompt,
            }],
        }
    }

    fn request(&self, payload: &MessagesRequest) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(payload)
    }

    async fn parse_error_response(status: StatusCode, response: reqwest::Response) -> ProviderError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read body>".to_string());

        let parsed = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .map(|err| err.error.message)
            .unwrap_or(body);

        ProviderError::HttpStatus {
            status: status.as_u16(),
            body: parsed,
        }
    }

    fn parse_event(_event: &str, data: &str) -> SseFrame {
        match serde_json::from_str::<StreamEvent>(data) {
            Ok(StreamEvent::ContentBlockDelta { delta }) => {
                delta.text.map_or(SseFrame::Skip, SseFrame::Delta)
            }
            Ok(StreamEvent::MessageStop) => SseFrame::Done,
            Ok(StreamEvent::Error { error }) => SseFrame::Fail(ProviderError::Message(error.message)),
            Ok(StreamEvent::Other) => SseFrame::Skip,
            Err(err) => SseFrame::Fail(ProviderError::Decode(err.to_string())),
        }
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn generate(&self, req: GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let payload = self.payload(req, false);
        debug!(model = %payload.model, "Requesting message");

        let response = self
            .request(&payload)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::parse_error_response(status, response).await);
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))?;

        let content = body
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        Ok(GenerateResponse {
            content,
            model: Some(body.model),
            finish_reason: body.stop_reason,
        })
    }

    async fn generate_stream(&self, req: GenerateRequest) -> Result<ProviderStream, ProviderError> {
        let payload = self.payload(req, true);
        debug!(model = %payload.model, "Streaming message");

        let event_source = self
            .request(&payload)
            .eventsource()
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        Ok(pump_events(self.name(), event_source, Self::parse_event))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
    messages: Vec<InputMessage>,
}

#[derive(Debug, Serialize)]
struct InputMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Stream events this provider reacts to; everything else is skipped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: DeltaText },
    MessageStop,
    Error { error: ErrorDetail },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct DeltaText {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
