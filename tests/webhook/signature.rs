//! tests/webhook/signature.rs
//! Signed event intake: valid deliveries are processed and replied to,
//! everything else is rejected before any processing happens.

#[path = "../common/mod.rs"]
mod common;

use devops_agent::whatsapp::signature;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn signed_text_message_is_processed_and_echoed() {
    let graph: MockServer = MockServer::start().await;

    // The agent echoes the text back through the Graph API.
    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", common::TEST_PHONE_NUMBER_ID)))
        .and(header(
            "authorization",
            format!("Bearer {}", common::TEST_ACCESS_TOKEN).as_str(),
        ))
        .and(body_partial_json(json!({
            "messaging_product": "whatsapp",
            "to": "254712345678",
            "type": "text",
            "text": { "body": "You said: hello there" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "id": "wamid.OUT" }]
        })))
        .expect(1)
        .mount(&graph)
        .await;

    let base_url: String = common::spawn_app(&graph.uri());

    let payload: Vec<u8> =
        serde_json::to_vec(&common::text_message_payload("254712345678", "hello there")).unwrap();
    let header: String = signature::sign(common::TEST_APP_SECRET.as_bytes(), &payload);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/webhook", base_url))
        .header("X-Hub-Signature-256", header)
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "status": "success" }));
}

#[tokio::test]
async fn invalid_signature_is_rejected_without_processing() {
    let graph: MockServer = MockServer::start().await;

    // No Graph call may happen for a rejected delivery.
    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", common::TEST_PHONE_NUMBER_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&graph)
        .await;

    let base_url: String = common::spawn_app(&graph.uri());

    let payload: Vec<u8> =
        serde_json::to_vec(&common::text_message_payload("254712345678", "hello")).unwrap();

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/webhook", base_url))
        .header("X-Hub-Signature-256", "sha256=0000000000000000")
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(resp.text().await.unwrap(), "Invalid signature");
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let payload: Vec<u8> =
        serde_json::to_vec(&common::text_message_payload("254712345678", "hello")).unwrap();

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/webhook", base_url))
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signed_but_unparsable_payload_is_a_server_error() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let payload: &[u8] = b"not json at all";
    let header: String = signature::sign(common::TEST_APP_SECRET.as_bytes(), payload);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/webhook", base_url))
        .header("X-Hub-Signature-256", header)
        .header("Content-Type", "application/json")
        .body(payload.to_vec())
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn status_updates_are_acknowledged_without_replies() {
    let graph: MockServer = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", common::TEST_PHONE_NUMBER_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&graph)
        .await;

    let base_url: String = common::spawn_app(&graph.uri());

    let payload: Vec<u8> = serde_json::to_vec(&json!({
        "entry": [{
            "changes": [{
                "value": {
                    "statuses": [{ "id": "wamid.X", "status": "delivered" }]
                }
            }]
        }]
    }))
    .unwrap();
    let header: String = signature::sign(common::TEST_APP_SECRET.as_bytes(), &payload);

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/webhook", base_url))
        .header("X-Hub-Signature-256", header)
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::OK);
}
