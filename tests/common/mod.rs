//! tests/common/mod.rs
//! Shared helper that spawns the webhook app on an ephemeral port.

use std::borrow::Cow;
use std::sync::Arc;

use devops_agent::config::{environment::EnvironmentVariables, state::AppState};
use devops_agent::core::server::build_router;

pub const TEST_ACCESS_TOKEN: &str = "test-access-token";
pub const TEST_APP_SECRET: &str = "test-app-secret";
pub const TEST_VERIFY_TOKEN: &str = "test-verify-token";
pub const TEST_PHONE_NUMBER_ID: &str = "15550000000001";

/// An environment pointing the Graph client at `graph_base_url`
pub fn test_environment(graph_base_url: &str) -> EnvironmentVariables {
    EnvironmentVariables {
        environment: Cow::Borrowed("test"),
        host: Cow::Borrowed("127.0.0.1"),
        port: 0,
        protocol: Cow::Borrowed("http"),
        max_request_body_size: 2_097_152,
        default_timeout_seconds: 3,
        meta_access_token: Some(TEST_ACCESS_TOKEN.to_string()),
        meta_app_secret: Some(TEST_APP_SECRET.to_string()),
        meta_verify_token: Some(TEST_VERIFY_TOKEN.to_string()),
        meta_phone_number_id: Some(TEST_PHONE_NUMBER_ID.to_string()),
        graph_api_base_url: Cow::Owned(graph_base_url.to_string()),
        github_token: None,
        github_username: None,
        github_repo: None,
        github_api_base_url: Cow::Borrowed("https://api.github.com"),
    }
}

/// Spawns the app on a random unused port and returns its base URL.
pub fn spawn_app(graph_base_url: &str) -> String {
    let state: AppState = AppState::with_environment(Arc::new(test_environment(graph_base_url)));

    // * Build the application using the same layers as the serve command.
    let app: axum::Router = build_router(state);

    // * Bind an ephemeral port using std::net::TcpListener.
    let std_listener: std::net::TcpListener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    // * Convert std::net::TcpListener to tokio::net::TcpListener.
    let tokio_listener: tokio::net::TcpListener =
        tokio::net::TcpListener::from_std(std_listener).expect("Failed to convert to tokio listener");

    let addr: std::net::SocketAddr = tokio_listener.local_addr().unwrap();

    // * Spawn the server in a background task.
    tokio::spawn(async move {
        axum::serve(tokio_listener, app)
            .await
            .expect("Server failed");
    });

    // * Return the base URL, e.g. "http://127.0.0.1:12345".
    format!("http://{}", addr)
}

/// A minimal text-message delivery the way Meta sends them
pub fn text_message_payload(from: &str, body: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "1234567890",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "messages": [{
                        "from": from,
                        "id": "wamid.TEST",
                        "timestamp": "1700000000",
                        "type": "text",
                        "text": { "body": body }
                    }]
                }
            }]
        }]
    })
}
