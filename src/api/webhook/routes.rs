// Webhook route definitions

use axum::{
    routing::get,
    Router,
};

use crate::config::state::AppState;
use super::handler;

/// GET is the Meta subscription handshake, POST is event intake
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route(
        "/webhook",
        get(handler::verify_webhook_handler).post(handler::receive_webhook_handler),
    )
}
