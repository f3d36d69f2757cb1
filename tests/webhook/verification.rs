//! tests/webhook/verification.rs
//! The Meta subscription handshake: the challenge must come back
//! verbatim for the right token and nothing else.

#[path = "../common/mod.rs"]
mod common;

use reqwest::StatusCode;

#[tokio::test]
async fn correct_token_echoes_the_challenge() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!(
            "{}/webhook?hub.mode=subscribe&hub.verify_token={}&hub.challenge=4242424242",
            base_url,
            common::TEST_VERIFY_TOKEN
        ))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::OK);

    // The challenge is echoed raw, not wrapped in the JSON envelope.
    let body: String = resp.text().await.unwrap();
    assert_eq!(body, "4242424242");
}

#[tokio::test]
async fn wrong_token_is_forbidden() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!(
            "{}/webhook?hub.mode=subscribe&hub.verify_token=not-the-token&hub.challenge=4242",
            base_url
        ))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(resp.text().await.unwrap(), "Verification failed");
}

#[tokio::test]
async fn wrong_mode_is_forbidden() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!(
            "{}/webhook?hub.mode=unsubscribe&hub.verify_token={}&hub.challenge=4242",
            base_url,
            common::TEST_VERIFY_TOKEN
        ))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_parameters_are_forbidden() {
    let base_url: String = common::spawn_app("http://127.0.0.1:9");

    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/webhook", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
