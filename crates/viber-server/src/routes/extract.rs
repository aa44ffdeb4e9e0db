use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use viber_provider::{ProviderConfig, ProviderId};
use viber_session::{extract_specs, ExtractError};

use super::{bad_request, provider_error_response, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/extract-specs", post(extract))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractBody {
    free_text: String,
    api_key: String,
    model: String,
    #[serde(default)]
    provider: Option<ProviderId>,
}

async fn extract(
    State(state): State<AppState>,
    Json(body): Json<ExtractBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.api_key.trim().is_empty() {
        return Err(bad_request("API key is required"));
    }
    if body.free_text.trim().is_empty() {
        return Err(bad_request("Project description is required"));
    }

    let config = ProviderConfig {
        provider: body.provider.unwrap_or(ProviderId::Anthropic),
        api_key: body.api_key,
        model: body.model,
        base_url: None,
    };
    let client = (state.factory)(&config);
    info!(provider = client.name(), "extracting specs");

    match extract_specs(client.as_ref(), &body.free_text).await {
        Ok(specs) => Ok(Json(json!({ "specs": specs }))),
        Err(ExtractError::EmptyInput) => Err(bad_request("Project description is required")),
        Err(ExtractError::Provider(err)) => Err(provider_error_response(err)),
        Err(err @ (ExtractError::NoJsonFound | ExtractError::InvalidJson(_))) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )),
    }
}
