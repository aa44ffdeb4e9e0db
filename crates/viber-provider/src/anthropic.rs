use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{ChunkStream, CompletionClient, CompletionRequest, ProviderConfig, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Capacity of the chunk-forwarding channel between the SSE reader task and
/// the consumer.
const CHUNK_CHANNEL_CAPACITY: usize = 100;

/// Anthropic Messages API client (streaming SSE and one-shot).
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn build_request<'a>(
        &'a self,
        request: &'a CompletionRequest,
        stream: bool,
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: request.prompt.clone(),
            }],
            stream,
        }
    }

    async fn send(
        &self,
        body: &MessagesRequest<'_>,
        accept: &str,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("accept", accept)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), &text));
        }
        Ok(resp)
    }
}

#[async_trait::async_trait]
impl CompletionClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<ChunkStream, ProviderError> {
        let body = self.build_request(&request, true);
        let resp = self.send(&body, "text/event-stream").await?;

        let (tx, rx) = mpsc::channel::<Result<String, ProviderError>>(CHUNK_CHANNEL_CAPACITY);
        let events = resp.bytes_stream().eventsource();

        tokio::spawn(async move {
            let mut events = std::pin::pin!(events);
            loop {
                let event = tokio::select! {
                    // Dropping the event stream tears the connection down.
                    _ = cancel.cancelled() => {
                        debug!("anthropic stream cancelled");
                        break;
                    }
                    next = events.next() => match next {
                        Some(ev) => ev,
                        None => break,
                    },
                };

                match event {
                    Ok(event) => {
                        if event.data.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<StreamEvent>(&event.data) {
                            Ok(StreamEvent::ContentBlockDelta { delta }) => {
                                if let Delta::TextDelta { text } = delta {
                                    if tx.send(Ok(text)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                            Ok(StreamEvent::Error { error }) => {
                                let _ = tx
                                    .send(Err(ProviderError::Api {
                                        status: 0,
                                        message: error.message,
                                    }))
                                    .await;
                                break;
                            }
                            Ok(StreamEvent::MessageStop) => break,
                            Ok(StreamEvent::Other) => {}
                            Err(e) => {
                                debug!("unparsed anthropic event: {e}");
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(ProviderError::Transport(e.to_string()))).await;
                        break;
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let body = self.build_request(&request, false);
        let resp = self.send(&body, "application/json").await?;

        let message: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(message
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    MessageStop,
    Error { error: ApiErrorBody },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}
