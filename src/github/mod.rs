// GitHub automation: subprocess push driver and REST API client.

pub mod api;
pub mod push;
