// Application state management with singleton pattern

use std::sync::Arc;
use once_cell::sync::Lazy;
use crate::config::environment::EnvironmentVariables;
use crate::whatsapp::client::WhatsAppClient;

// AppState singleton
#[derive(Debug, Clone)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub whatsapp: WhatsAppClient,
}

impl AppState {
    /// Creates a new AppState from the process environment
    pub fn new() -> anyhow::Result<Self> {
        let environment: EnvironmentVariables = EnvironmentVariables::load()?;
        Ok(Self::with_environment(Arc::new(environment)))
    }

    /// Creates an AppState around an explicit environment.
    /// Tests build their configuration directly and hand it in here.
    pub fn with_environment(environment: Arc<EnvironmentVariables>) -> Self {
        let whatsapp: WhatsAppClient = WhatsAppClient::new(environment.clone());

        Self {
            environment,
            whatsapp,
        }
    }

    /// Returns the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: Lazy<AppState> = Lazy::new(|| {
            AppState::new().expect("Failed to initialize AppState")
        });
        &INSTANCE
    }
}
