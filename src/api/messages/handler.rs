// Operator send API

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument};

use crate::config::state::AppState;
use crate::utils::response_handler::HandlerResponse;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub to: Option<String>,
    pub message: Option<String>,
}

/// Sends a text message to a recipient on behalf of the operator
#[instrument(name = "send_message", skip(state, request))]
pub async fn send_message_handler(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> HandlerResponse {
    let to: Option<String> = request.to.filter(|value| !value.trim().is_empty());
    let message: Option<String> = request.message.filter(|value| !value.trim().is_empty());

    let (Some(to), Some(message)) = (to, message) else {
        return HandlerResponse::new(StatusCode::BAD_REQUEST)
            .data(json!({ "error": "Missing to or message" }))
            .message("Both 'to' and 'message' are required");
    };

    match state.whatsapp.send_text(&to, &message).await {
        Ok(()) => HandlerResponse::new(StatusCode::OK)
            .data(json!({ "status": "sent" }))
            .message(format!("Message sent to {}", to)),
        Err(e) => {
            error!("Failed to send message to {}: {:#}", to, e);
            HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                .data(json!({ "error": e.to_string() }))
                .message("Failed to send message")
        }
    }
}
