// Typed view of Meta webhook deliveries.
// Every field the dispatcher does not need is left out; unknown fields
// are ignored so new Graph API versions keep deserializing.

use serde::Deserialize;

/// Top-level webhook delivery body
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: ChangeValue,
}

/// Payload of a single change: incoming messages and/or status updates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    #[serde(default)]
    pub statuses: Vec<MessageStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextContent>,
    #[serde(default)]
    pub image: Option<MediaContent>,
    #[serde(default)]
    pub location: Option<LocationContent>,
    #[serde(default)]
    pub interactive: Option<InteractiveContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaContent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationContent {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractiveContent {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageStatus {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub recipient_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_text_message_delivery() {
        let raw: &str = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "1234567890",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "messages": [{
                            "from": "254712345678",
                            "id": "wamid.ABC",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": { "body": "hello there" }
                        }]
                    }
                }]
            }]
        }"#;

        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.object.as_deref(), Some("whatsapp_business_account"));

        let message: &IncomingMessage = &event.entry[0].changes[0].value.messages[0];
        assert_eq!(message.from.as_deref(), Some("254712345678"));
        assert_eq!(message.kind, "text");
        assert_eq!(message.text.as_ref().unwrap().body, "hello there");
    }

    #[test]
    fn deserializes_status_updates_without_messages() {
        let raw: &str = r#"{
            "entry": [{
                "changes": [{
                    "value": {
                        "statuses": [{
                            "id": "wamid.XYZ",
                            "status": "delivered",
                            "recipient_id": "254712345678"
                        }]
                    }
                }]
            }]
        }"#;

        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        let value: &ChangeValue = &event.entry[0].changes[0].value;

        assert!(value.messages.is_empty());
        assert_eq!(value.statuses[0].status, "delivered");
    }

    #[test]
    fn tolerates_a_change_without_value() {
        let raw: &str = r#"{ "entry": [{ "changes": [{ "field": "messages" }] }] }"#;
        let event: WebhookEvent = serde_json::from_str(raw).unwrap();

        assert!(event.entry[0].changes[0].value.messages.is_empty());
        assert!(event.entry[0].changes[0].value.statuses.is_empty());
    }
}
