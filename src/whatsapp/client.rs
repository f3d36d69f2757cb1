// Outbound Graph API client for WhatsApp Business messaging

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::environment::EnvironmentVariables;

/// One button of an interactive reply message
#[derive(Debug, Clone, Serialize)]
pub struct ReplyButton {
    pub id: String,
    pub title: String,
}

/// Client for the `/{phone_number_id}/messages` Graph API endpoint.
/// The base URL comes from configuration so tests can point it at a
/// local mock server.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    environment: Arc<EnvironmentVariables>,
}

impl WhatsAppClient {
    pub fn new(environment: Arc<EnvironmentVariables>) -> Self {
        Self {
            http: reqwest::Client::new(),
            environment,
        }
    }

    /// Sends a plain text message
    pub async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        self.post_message(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": body }
        }))
        .await?;

        info!("Message sent to {}", to);
        Ok(())
    }

    /// Sends a pre-approved template message
    pub async fn send_template(&self, to: &str, template_name: &str, language: &str) -> Result<()> {
        self.post_message(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "template",
            "template": {
                "name": template_name,
                "language": { "code": language }
            }
        }))
        .await?;

        info!("Template '{}' sent to {}", template_name, to);
        Ok(())
    }

    /// Sends an interactive message with reply buttons
    pub async fn send_interactive_buttons(
        &self,
        to: &str,
        body_text: &str,
        buttons: &[ReplyButton],
    ) -> Result<()> {
        let rendered_buttons: Vec<Value> = buttons
            .iter()
            .map(|button| json!({ "type": "reply", "reply": button }))
            .collect();

        self.post_message(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "interactive",
            "interactive": {
                "type": "button",
                "body": { "text": body_text },
                "action": { "buttons": rendered_buttons }
            }
        }))
        .await?;

        info!("Interactive message sent to {}", to);
        Ok(())
    }

    async fn post_message(&self, payload: Value) -> Result<()> {
        let environment: &EnvironmentVariables = &self.environment;

        let phone_number_id: &str = environment
            .meta_phone_number_id
            .as_deref()
            .context("META_PHONE_NUMBER_ID is not set")?;
        let access_token: &str = environment
            .meta_access_token
            .as_deref()
            .context("META_ACCESS_TOKEN is not set")?;

        let url: String = format!(
            "{}/{}/messages",
            environment.graph_api_base_url, phone_number_id
        );

        let response: reqwest::Response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .context("Graph API request failed")?;

        let status: reqwest::StatusCode = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body: String = response.text().await.unwrap_or_default();
        Err(anyhow!("Graph API returned {}: {}", status, body))
    }
}
