// Health probe for monitoring

use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::instrument;

use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

/// Reports service health, the instance hostname and whether the
/// webhook credentials are fully configured
#[instrument(name = "health", skip(state))]
pub async fn health_handler(State(state): State<AppState>) -> HandlerResponse {
    let host: String = hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());

    HandlerResponse::new(StatusCode::OK)
        .data(json!({
            "status": "healthy",
            "service": "devops-agent-webhook",
            "hostname": host,
            "environment": state.environment.environment.as_ref(),
            "credentials_loaded": state.environment.webhook_credentials_loaded(),
        }))
        .message("Webhook service is running")
}
