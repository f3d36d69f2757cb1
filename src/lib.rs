// Library root for the DevOps automation agent

pub mod activity;
pub mod api;
pub mod check;
pub mod cli;
pub mod config;
pub mod core;
pub mod github;
pub mod scaffold;
pub mod utils;
pub mod vault;
pub mod whatsapp;
pub mod wizard;

pub use crate::config::environment::EnvironmentVariables;
pub use crate::config::state::AppState;
