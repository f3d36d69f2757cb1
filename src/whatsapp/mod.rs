// WhatsApp Business integration: outbound Graph API client, typed
// webhook payloads and delivery signature verification.

pub mod client;
pub mod events;
pub mod signature;
