// Operator send API route definitions

use axum::{
    routing::post,
    Router,
};

use crate::config::state::AppState;
use super::handler;

pub fn message_routes() -> Router<AppState> {
    Router::new().route("/send", post(handler::send_message_handler))
}
