use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    ChunkStream, CompletionClient, CompletionRequest, ProviderConfig, ProviderError, ProviderId,
};

const CHUNK_CHANNEL_CAPACITY: usize = 100;

/// Client for OpenAI-compatible chat-completions endpoints: OpenAI itself,
/// Gemini's compatibility surface, and Grok.
pub struct OpenAiCompatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    provider: ProviderId,
}

/// OpenAI reasoning models reject `max_tokens` and the system role; they take
/// `max_completion_tokens` and the system text folded into the user message.
fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("o1") || model.starts_with("o3") || model.starts_with("o4")
}

impl OpenAiCompatClient {
    pub fn new(config: &ProviderConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .or_else(|| config.provider.openai_base_url().map(String::from))
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        Self {
            client: Client::new(),
            base_url,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            provider: config.provider,
        }
    }

    fn build_request(&self, request: &CompletionRequest, stream: bool) -> ChatRequest<'_> {
        let reasoning = self.provider == ProviderId::Openai && is_reasoning_model(&self.model);

        let mut messages = Vec::new();
        let user_content = match (&request.system, reasoning) {
            (Some(system), true) => format!("{system}\n\n{}", request.prompt),
            (Some(system), false) => {
                messages.push(ChatMessage {
                    role: "system",
                    content: system.clone(),
                });
                request.prompt.clone()
            }
            (None, _) => request.prompt.clone(),
        };
        messages.push(ChatMessage {
            role: "user",
            content: user_content,
        });

        ChatRequest {
            model: &self.model,
            messages,
            stream,
            max_tokens: (!reasoning).then_some(request.max_tokens),
            max_completion_tokens: reasoning.then_some(request.max_tokens),
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response, ProviderError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
impl CompletionClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        self.provider.as_str()
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<ChunkStream, ProviderError> {
        let body = self.build_request(&request, true);
        let resp = self.send(&body).await?;

        let (tx, rx) = mpsc::channel::<Result<String, ProviderError>>(CHUNK_CHANNEL_CAPACITY);
        let events = resp.bytes_stream().eventsource();

        tokio::spawn(async move {
            let mut events = std::pin::pin!(events);
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("openai-compatible stream cancelled");
                        break;
                    }
                    next = events.next() => match next {
                        Some(ev) => ev,
                        None => break,
                    },
                };

                match event {
                    Ok(event) => {
                        if event.data.is_empty() || event.data == "[DONE]" {
                            if event.data == "[DONE]" {
                                break;
                            }
                            continue;
                        }
                        match serde_json::from_str::<ChatChunk>(&event.data) {
                            Ok(chunk) => {
                                let text = chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|c| c.delta.content);
                                if let Some(text) = text {
                                    if !text.is_empty() && tx.send(Ok(text)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                            Err(e) => {
                                debug!("unparsed chat chunk: {e}");
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
        let resp = self.send(&body).await?;

        let completion: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for_model(provider: ProviderId, model: &str) -> OpenAiCompatClient {
        OpenAiCompatClient::new(&ProviderConfig::new(provider, "sk-test", model))
    }

    #[test]
    fn reasoning_model_detection() {
        assert!(is_reasoning_model("o1-mini"));
        assert!(is_reasoning_model("o3"));
        assert!(is_reasoning_model("o4-mini-high"));
        assert!(!is_reasoning_model("gpt-4o"));
        assert!(!is_reasoning_model("grok-3"));
    }

    #[test]
    fn base_url_follows_provider() {
        assert_eq!(
            client_for_model(ProviderId::Grok, "grok-3").base_url,
            "https://api.x.ai/v1"
        );
        assert!(client_for_model(ProviderId::Gemini, "gemini-2.0-flash")
            .base_url
            .contains("generativelanguage"));
    }

    #[test]
    fn standard_model_keeps_system_role_and_max_tokens() {
        let c = client_for_model(ProviderId::Openai, "gpt-4o");
        let req = CompletionRequest {
            system: Some("sys".into()),
            prompt: "hi".into(),
            max_tokens: 1024,
        };
        let json = serde_json::to_value(c.build_request(&req, true)).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 1024);
        assert!(json.get("max_completion_tokens").is_none());
    }

    #[test]
    fn reasoning_model_folds_system_into_user() {
        let c = client_for_model(ProviderId::Openai, "o3-mini");
        let req = CompletionRequest {
            system: Some("sys".into()),
            prompt: "hi".into(),
            max_tokens: 1024,
        };
        let json = serde_json::to_value(c.build_request(&req, false)).unwrap();
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "sys\n\nhi");
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["max_completion_tokens"], 1024);
    }

    #[test]
    fn reasoning_quirks_only_apply_to_openai() {
        // Grok model names never hit the o1/o3/o4 path, and even a
        // reasoning-looking model on another provider keeps max_tokens.
        let c = client_for_model(ProviderId::Grok, "o3-mini");
        let req = CompletionRequest {
            system: Some("sys".into()),
            prompt: "hi".into(),
            max_tokens: 512,
        };
        let json = serde_json::to_value(c.build_request(&req, false)).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 512);
    }

    #[test]
    fn chunk_delta_parses() {
        let data = r#"{"choices":[{"index":0,"delta":{"content":"hi"},"finish_reason":null}]}"#;
        let chunk: ChatChunk = serde_json::from_str(data).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hi"));
    }

    #[test]
    fn chunk_delta_tolerates_missing_content() {
        let data = r#"{"choices":[{"index":0,"delta":{"role":"assistant"},"finish_reason":null}]}"#;
        let chunk: ChatChunk = serde_json::from_str(data).unwrap();
        assert!(chunk.choices[0].delta.content.is_none());
    }
}
