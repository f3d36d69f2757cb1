// * Environment configuration with a singleton pattern.
// * Server settings carry defaults; Meta and GitHub credentials stay
// * optional until the command that needs them runs.

use std::{borrow::Cow, collections::HashMap};
// * anyhow for convenient error handling
use anyhow::{Context, Result};
// * once_cell for lazy static initialization
use once_cell::sync::Lazy;
use tracing::warn;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PROTOCOL: &str = "http";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 2_097_152; // 2MB
const DEFAULT_TIMEOUT: u64 = 3; // 3 seconds
const DEFAULT_GRAPH_API_BASE_URL: &str = "https://graph.facebook.com/v18.0";
const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";

// * A struct containing all environment variables used by the agent
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub protocol: Cow<'static, str>,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    // Meta WhatsApp Business API
    pub meta_access_token: Option<String>,
    pub meta_app_secret: Option<String>,
    pub meta_verify_token: Option<String>,
    pub meta_phone_number_id: Option<String>,
    pub graph_api_base_url: Cow<'static, str>,
    // GitHub
    pub github_token: Option<String>,
    pub github_username: Option<String>,
    pub github_repo: Option<String>,
    pub github_api_base_url: Cow<'static, str>,
}

impl EnvironmentVariables {
    // * Loads environment variables once.
    // * Only reads .env if ENVIRONMENT != "production".
    pub fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        // * A small helper closure to fetch a variable by key
        let get_var = |key: &str| vars.get(key).map(String::as_str);
        // * Empty strings count as unset for credential variables
        let get_credential = |key: &str| {
            get_var(key)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        // * Build our EnvironmentVariables, providing defaults if missing
        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            protocol: get_var("PROTOCOL")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_PROTOCOL)),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            meta_access_token: get_credential("META_ACCESS_TOKEN"),
            meta_app_secret: get_credential("META_APP_SECRET"),
            meta_verify_token: get_credential("META_VERIFY_TOKEN"),
            meta_phone_number_id: get_credential("META_PHONE_NUMBER_ID"),

            graph_api_base_url: get_var("GRAPH_API_BASE_URL")
                .map(|s| Cow::Owned(s.trim_end_matches('/').to_string()))
                .unwrap_or(Cow::Borrowed(DEFAULT_GRAPH_API_BASE_URL)),

            github_token: get_credential("GITHUB_TOKEN"),
            github_username: get_credential("GITHUB_USERNAME"),
            github_repo: get_credential("GITHUB_REPO"),

            github_api_base_url: get_var("GITHUB_API_BASE_URL")
                .map(|s| Cow::Owned(s.trim_end_matches('/').to_string()))
                .unwrap_or(Cow::Borrowed(DEFAULT_GITHUB_API_BASE_URL)),
        })
    }

    // * Returns a reference to the lazily-initialized environment configuration
    pub fn instance() -> &'static Self {
        static INSTANCE: Lazy<Result<EnvironmentVariables, anyhow::Error>> = Lazy::new(|| {
            let config: EnvironmentVariables = EnvironmentVariables::load()?;

            if cfg!(debug_assertions) {
                tracing::debug!("Loaded environment configuration: {:#?}", config);
            }

            Ok(config)
        });

        // ! Panics if loading fails
        INSTANCE.as_ref().expect("Failed to load environment configuration")
    }

    /// Names of the webhook-critical variables that are currently unset.
    /// The webhook server refuses to start while this list is non-empty.
    pub fn missing_webhook_vars(&self) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = Vec::new();

        if self.meta_access_token.is_none() {
            missing.push("META_ACCESS_TOKEN");
        }
        if self.meta_verify_token.is_none() {
            missing.push("META_VERIFY_TOKEN");
        }
        if self.meta_phone_number_id.is_none() {
            missing.push("META_PHONE_NUMBER_ID");
        }

        missing
    }

    /// True when every webhook-critical variable is set.
    pub fn webhook_credentials_loaded(&self) -> bool {
        self.missing_webhook_vars().is_empty()
    }
}
