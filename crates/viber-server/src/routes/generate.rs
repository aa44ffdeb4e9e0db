use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::{routing::post, Json, Router};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::info;
use viber_core::{OutputMode, ProjectSpecs};
use viber_prompts::{assemble_generation_prompt, max_tokens_for, SYSTEM_PROMPT};
use viber_provider::{CompletionRequest, ProviderConfig, ProviderId};

use super::{bad_request, provider_error_response, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/generate-scaffold", post(generate_scaffold))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    specs: ProjectSpecs,
    api_key: String,
    model: String,
    #[serde(default)]
    provider: Option<ProviderId>,
}

async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    start_generation(state, body, OutputMode::ClaudeMd).await
}

async fn generate_scaffold(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    start_generation(state, body, OutputMode::FullScaffold).await
}

/// Open the provider stream and forward its text fragments as a chunked
/// `text/plain` body, exactly as they arrive.
async fn start_generation(
    state: AppState,
    body: GenerateBody,
    mode: OutputMode,
) -> Result<Response, (StatusCode, Json<Value>)> {
    if body.api_key.trim().is_empty() {
        return Err(bad_request("API key is required"));
    }
    if body.specs.project_name.trim().is_empty() {
        return Err(bad_request("Project name is required"));
    }

    let config = ProviderConfig {
        provider: body.provider.unwrap_or(ProviderId::Anthropic),
        api_key: body.api_key,
        model: body.model,
        base_url: None,
    };
    let client = (state.factory)(&config);
    let request = CompletionRequest {
        system: Some(SYSTEM_PROMPT.to_string()),
        prompt: assemble_generation_prompt(&body.specs, mode),
        max_tokens: max_tokens_for(mode),
    };

    info!(
        provider = client.name(),
        mode = %mode,
        project = %body.specs.project_name,
        "starting generation"
    );

    // The token lives for the duration of the response body; dropping the
    // body (client disconnect) tears the provider stream down with it.
    let cancel = CancellationToken::new();
    let stream = client
        .stream(request, cancel)
        .await
        .map_err(provider_error_response)?;

    let body_stream = stream.map(|chunk| chunk.map(Bytes::from));
    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        })?;
    Ok(response)
}
