//! HTTP providers for hosted chat models.
//!
//! Both providers stream over server-sent events; the pump below turns an
//! event source into a [`ProviderStream`] and leaves wire parsing to the caller.

pub mod anthropic;
pub mod openai;

use std::time::Duration;

use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::{ProviderError, ProviderStream, StreamChunk};

pub use anthropic::AnthropicProvider;
pub use openai::OpenAIProvider;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// What one server-sent event means for the output stream.
#[derive(Debug)]
pub(crate) enum SseFrame {
    Delta(String),
    Skip,
    Done,
    Fail(ProviderError),
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ProviderError::Transport(err.to_string()))
}

/// Forwards parsed frames from `event_source` until a terminal frame.
///
/// The stream always ends with exactly one `Done` unless an error was emitted.
/// The source is closed on every exit path so it never reconnects.
pub(crate) fn pump_events(
    provider: &'static str,
    mut event_source: EventSource,
    parse: fn(&str, &str) -> SseFrame,
) -> ProviderStream {
    let (tx, rx) = mpsc::channel::<Result<StreamChunk, ProviderError>>(32);

    tokio::spawn(async move {
        let mut finished = false;

        while let Some(event) = event_source.next().await {
            let frame = match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => parse(&message.event, &message.data),
                Err(reqwest_eventsource::Error::StreamEnded) => SseFrame::Done,
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<unable to read body>".to_string());
                    SseFrame::Fail(ProviderError::HttpStatus {
                        status: status.as_u16(),
                        body,
                    })
                }
                Err(err) => SseFrame::Fail(ProviderError::Transport(err.to_string())),
            };

            match frame {
                SseFrame::Skip => {}
                SseFrame::Delta(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    if tx.send(Ok(StreamChunk::Delta { text })).await.is_err() {
                        debug!(provider, "Stream receiver dropped, closing event source");
                        finished = true;
                        break;
                    }
                }
                SseFrame::Done => {
                    let _ = tx.send(Ok(StreamChunk::Done)).await;
                    finished = true;
                    break;
                }
                SseFrame::Fail(err) => {
                    let _ = tx.send(Err(err)).await;
                    finished = true;
                    break;
                }
            }
        }

        event_source.close();
        if !finished {
            let _ = tx.send(Ok(StreamChunk::Done)).await;
        }
    });

    Box::pin(ReceiverStream::new(rx))
}
