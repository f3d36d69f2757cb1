// Live credential checks: confirms the configured Meta and GitHub
// credentials actually work before anything depends on them

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::config::environment::EnvironmentVariables;
use crate::github::api::GitHubApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub service: String,
    pub status: CheckStatus,
    pub detail: String,
}

#[derive(Debug, Deserialize)]
struct PhoneNumberResponse {
    #[serde(default)]
    display_phone_number: Option<String>,
    #[serde(default)]
    verified_name: Option<String>,
    #[serde(default)]
    quality_rating: Option<String>,
}

pub struct CredentialChecker {
    http: reqwest::Client,
    environment: Arc<EnvironmentVariables>,
}

impl CredentialChecker {
    pub fn new(environment: Arc<EnvironmentVariables>) -> Self {
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client builds with static configuration");

        Self { http, environment }
    }

    pub async fn check_all(&self) -> Vec<CheckReport> {
        vec![self.check_meta().await, self.check_github().await]
    }

    /// Fetches the configured phone number object; a 401 singles out a
    /// dead token from other API failures
    pub async fn check_meta(&self) -> CheckReport {
        let service: String = "meta_whatsapp".to_string();

        let (Some(token), Some(phone_number_id)) = (
            self.environment.meta_access_token.as_deref(),
            self.environment.meta_phone_number_id.as_deref(),
        ) else {
            return CheckReport {
                service,
                status: CheckStatus::Skipped,
                detail: "META_ACCESS_TOKEN or META_PHONE_NUMBER_ID not set".to_string(),
            };
        };

        info!("Testing Meta WhatsApp credentials");

        let url: String = format!("{}/{}", self.environment.graph_api_base_url, phone_number_id);
        let response: reqwest::Response = match self.http.get(&url).bearer_auth(token).send().await
        {
            Ok(response) => response,
            Err(e) => {
                return CheckReport {
                    service,
                    status: CheckStatus::Failed,
                    detail: e.to_string(),
                }
            }
        };

        match response.status() {
            status if status.is_success() => {
                let phone: PhoneNumberResponse = response.json().await.unwrap_or(
                    PhoneNumberResponse {
                        display_phone_number: None,
                        verified_name: None,
                        quality_rating: None,
                    },
                );

                CheckReport {
                    service,
                    status: CheckStatus::Passed,
                    detail: format!(
                        "{} ({}), quality: {}",
                        phone.display_phone_number.as_deref().unwrap_or("unknown number"),
                        phone.verified_name.as_deref().unwrap_or("unverified"),
                        phone.quality_rating.as_deref().unwrap_or("unknown"),
                    ),
                }
            }
            reqwest::StatusCode::UNAUTHORIZED => CheckReport {
                service,
                status: CheckStatus::Failed,
                detail: "Access token invalid or expired".to_string(),
            },
            status => CheckReport {
                service,
                status: CheckStatus::Failed,
                detail: format!("API returned {}", status),
            },
        }
    }

    /// Confirms the GitHub token can read the configured repository
    pub async fn check_github(&self) -> CheckReport {
        let service: String = "github".to_string();

        let api: GitHubApi = match GitHubApi::from_environment(&self.environment) {
            Ok(api) => api,
            Err(e) => {
                return CheckReport {
                    service,
                    status: CheckStatus::Skipped,
                    detail: e.to_string(),
                }
            }
        };

        info!("Testing GitHub credentials");

        match api.latest_commit().await {
            Ok(Some(commit)) => CheckReport {
                service,
                status: CheckStatus::Passed,
                detail: format!(
                    "latest commit {} ({})",
                    &commit.sha[..commit.sha.len().min(7)],
                    commit.date
                ),
            },
            Ok(None) => CheckReport {
                service,
                status: CheckStatus::Passed,
                detail: "repository reachable, no commits yet".to_string(),
            },
            Err(e) => CheckReport {
                service,
                status: CheckStatus::Failed,
                detail: e.to_string(),
            },
        }
    }
}
