//! tests/webhook/health.rs
//! The health probe reports readiness inside the JSON envelope.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_reports_ok_with_credentials_loaded() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::OK);

    let body: String = resp.text().await.unwrap();
    let json: Value = serde_json::from_str(&body).unwrap();

    // Envelope fields
    assert_eq!(json["status"], "OK");
    assert_eq!(json["code"], 200);

    // Payload fields
    assert_eq!(json["data"]["status"], "healthy");
    assert_eq!(json["data"]["service"], "devops-agent-webhook");
    assert_eq!(json["data"]["credentials_loaded"], true);
    assert!(json["data"]["hostname"].is_string());
}

#[tokio::test]
async fn unknown_routes_return_404() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/does-not-exist", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
