//! tests/webhook/send.rs
//! The operator send API validates input and relays through the
//! Graph client.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn missing_fields_are_a_bad_request() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/send", base_url))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "BAD_REQUEST");
    assert_eq!(body["code"], 400);
    assert_eq!(body["data"]["error"], "Missing to or message");
}

#[tokio::test]
async fn empty_strings_count_as_missing() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/send", base_url))
        .json(&json!({ "to": "", "message": "  " }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_request_sends_through_the_graph_client() {
    let graph: MockServer = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", common::TEST_PHONE_NUMBER_ID)))
        .and(body_partial_json(json!({
            "to": "254712345678",
            "type": "text",
            "text": { "body": "Hello from the API!" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "id": "wamid.OUT" }]
        })))
        .expect(1)
        .mount(&graph)
        .await;

    let base_url: String = common::spawn_app(&graph.uri());

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/send", base_url))
        .json(&json!({ "to": "254712345678", "message": "Hello from the API!" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "sent");
}

#[tokio::test]
async fn graph_failures_surface_as_server_errors() {
    let graph: MockServer = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", common::TEST_PHONE_NUMBER_ID)))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "something went wrong" }
        })))
        .mount(&graph)
        .await;

    let base_url: String = common::spawn_app(&graph.uri());

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/send", base_url))
        .json(&json!({ "to": "254712345678", "message": "Hello" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
