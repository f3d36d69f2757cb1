// Meta webhook handlers: subscription handshake and event intake

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::config::state::AppState;
use crate::whatsapp::events::{ChangeValue, IncomingMessage, WebhookEvent};
use crate::whatsapp::signature;

/// Query parameters of the verification handshake.
/// Meta sends them dot-named: hub.mode, hub.verify_token, hub.challenge.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Handshake endpoint Meta calls when the webhook URL is registered.
/// The challenge must be echoed back verbatim, so this handler stays
/// outside the JSON response envelope.
#[instrument(name = "verify_webhook", skip(state, params), fields(mode = ?params.mode))]
pub async fn verify_webhook_handler(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    info!("Webhook verification attempt");

    let expected_token: Option<&str> = state.environment.meta_verify_token.as_deref();

    match (params.mode.as_deref(), params.verify_token.as_deref(), params.challenge) {
        (Some("subscribe"), Some(token), Some(challenge)) if expected_token == Some(token) => {
            info!("Webhook verified successfully");
            (StatusCode::OK, challenge).into_response()
        }
        _ => {
            warn!("Webhook verification failed: token mismatch");
            (StatusCode::FORBIDDEN, "Verification failed").into_response()
        }
    }
}

/// Event intake endpoint. The raw body is needed twice: first for the
/// HMAC check against `X-Hub-Signature-256`, then for deserialization.
#[instrument(name = "receive_webhook", skip(state, headers, body))]
pub async fn receive_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature_header: &str = headers
        .get("X-Hub-Signature-256")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.environment.meta_app_secret.as_deref() {
        Some(secret) => {
            if !signature::verify(secret.as_bytes(), &body, signature_header) {
                warn!("Invalid signature: possible unauthorized request");
                return (StatusCode::FORBIDDEN, "Invalid signature").into_response();
            }
        }
        // Dev mode: without an app secret there is nothing to check against
        None => warn!("META_APP_SECRET not set, accepting unsigned delivery"),
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            error!("Webhook payload error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    info!("Received webhook data");

    for entry in event.entry {
        for change in entry.changes {
            let value: ChangeValue = change.value;

            for message in value.messages {
                process_message(&state, message).await;
            }

            for status in value.statuses {
                info!("Message status: {}", status.status);
            }
        }
    }

    (StatusCode::OK, Json(json!({ "status": "success" }))).into_response()
}

/// Dispatches one incoming message by type and sends the canned reply.
/// Send failures are logged and never fail the delivery.
async fn process_message(state: &AppState, message: IncomingMessage) {
    let Some(sender) = message.from.clone() else {
        warn!("Message without sender, ignoring");
        return;
    };

    info!("New {} message from {}", message.kind, sender);

    let reply: Option<String> = match message.kind.as_str() {
        "text" => {
            let text: String = message.text.map(|t| t.body).unwrap_or_default();
            info!("Text: {}", text);
            Some(format!("You said: {}", text))
        }
        "image" => {
            if let Some(image) = &message.image {
                info!("Image ID: {:?}, Caption: {:?}", image.id, image.caption);
            }
            Some("Got your image! 📸".to_string())
        }
        "location" => {
            if let Some(location) = &message.location {
                info!("Location: {:?}, {:?}", location.latitude, location.longitude);
            }
            Some("Thanks for sharing your location! 📍".to_string())
        }
        "interactive" => {
            let kind: Option<&str> = message
                .interactive
                .as_ref()
                .and_then(|content| content.kind.as_deref());
            info!("Interactive: {:?}", kind);
            None
        }
        other => {
            info!("Unhandled message type: {}", other);
            None
        }
    };

    if let Some(body) = reply {
        if let Err(e) = state.whatsapp.send_text(&sender, &body).await {
            error!("Failed to reply to {}: {:#}", sender, e);
        }
    }
}
