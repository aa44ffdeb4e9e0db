pub mod anthropic;
pub mod mock;
pub mod openai;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use anthropic::AnthropicClient;
pub use mock::MockClient;
pub use openai::OpenAiCompatClient;

/// Which LLM provider a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Anthropic,
    Openai,
    Gemini,
    Grok,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Anthropic => "anthropic",
            ProviderId::Openai => "openai",
            ProviderId::Gemini => "gemini",
            ProviderId::Grok => "grok",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "anthropic" => Some(ProviderId::Anthropic),
            "openai" => Some(ProviderId::Openai),
            "gemini" => Some(ProviderId::Gemini),
            "grok" => Some(ProviderId::Grok),
            _ => None,
        }
    }

    /// Base URL of the OpenAI-compatible endpoint, for the providers that
    /// speak that dialect. Anthropic uses its own Messages API.
    pub fn openai_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderId::Anthropic => None,
            ProviderId::Openai => Some("https://api.openai.com/v1"),
            ProviderId::Gemini => {
                Some("https://generativelanguage.googleapis.com/v1beta/openai/")
            }
            ProviderId::Grok => Some("https://api.x.ai/v1"),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials and routing for one provider call.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    pub api_key: String,
    pub model: String,
    /// Endpoint override (e.g., a proxy or an Anthropic-compatible server).
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderId, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }
}

/// Provider failure taxonomy. Display strings are the user-facing messages.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidCredentials,

    #[error("Insufficient API credits — please add credits at console.anthropic.com")]
    InsufficientCredits(String),

    #[error("Rate limited — please wait a moment and try again")]
    RateLimited(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Map a non-success HTTP response to an error, pulling the provider's
    /// own message out of a JSON error body when one is present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_api_message(body)
            .unwrap_or_else(|| format!("HTTP {status}: {}", preview(body)));
        match status {
            401 | 403 => ProviderError::InvalidCredentials,
            402 => ProviderError::InsufficientCredits(message),
            429 => ProviderError::RateLimited(message),
            _ if message.contains("credit balance") || message.contains("billing") => {
                ProviderError::InsufficientCredits(message)
            }
            _ if message.contains("authentication") => ProviderError::InvalidCredentials,
            _ => ProviderError::Api { status, message },
        }
    }
}

/// Pull `error.message` out of a provider JSON error body.
fn extract_api_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(String::from))
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

/// One completion call: optional system prompt, the user prompt, and the
/// output token budget.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
}

/// Text fragments as they arrive from the provider.
pub type ChunkStream = BoxStream<'static, Result<String, ProviderError>>;

/// A provider that turns a prompt into completion text.
///
/// Two flavors share this trait: [`stream`](CompletionClient::stream) yields
/// many small fragments, [`complete`](CompletionClient::complete) yields the
/// whole response at once (used for spec extraction). Consumers treat both
/// as a sequence of one or more fragments.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Open a cancellable stream of text fragments.
    ///
    /// The token must reach the transport: cancelling it drops the
    /// connection rather than merely ignoring the remaining chunks.
    async fn stream(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<ChunkStream, ProviderError>;

    /// Run the request to completion and return the full response text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

/// Build the client for a provider config.
pub fn client_for(config: &ProviderConfig) -> Arc<dyn CompletionClient> {
    match config.provider {
        ProviderId::Anthropic => Arc::new(AnthropicClient::new(config)),
        ProviderId::Openai | ProviderId::Gemini | ProviderId::Grok => {
            Arc::new(OpenAiCompatClient::new(config))
        }
    }
}
