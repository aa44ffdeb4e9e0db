pub mod extract;
pub mod generate;
pub mod health;

use axum::http::StatusCode;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use viber_provider::ProviderError;
use viber_session::ClientFactory;

/// Shared route state: the provider-client factory, injectable so tests
/// swap in scripted clients.
#[derive(Clone)]
pub struct AppState {
    pub factory: ClientFactory,
}

pub fn build_router(factory: ClientFactory) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(generate::routes())
        .merge(extract::routes())
        .layer(CorsLayer::permissive())
        .with_state(AppState { factory })
}

/// Map a provider failure to the HTTP status the original API used.
pub(crate) fn provider_error_response(err: ProviderError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        ProviderError::MissingApiKey => StatusCode::BAD_REQUEST,
        ProviderError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ProviderError::InsufficientCredits(_) => StatusCode::PAYMENT_REQUIRED,
        ProviderError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        ProviderError::Api { .. }
        | ProviderError::Transport(_)
        | ProviderError::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

pub(crate) fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}
