// GitHub REST client: push verification, repository metadata, issues

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::config::environment::EnvironmentVariables;

/// The latest commit on the default branch, as reported by the API
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
    pub date: String,
}

/// Repository metadata subset the operator commands display
#[derive(Debug, Clone, Serialize)]
pub struct RepoInfo {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub default_branch: String,
    pub last_push: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    description: Option<String>,
    html_url: String,
    stargazers_count: u64,
    forks_count: u64,
    default_branch: String,
    pushed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    html_url: String,
}

/// Thin client over the GitHub REST v3 API for one repository
#[derive(Debug, Clone)]
pub struct GitHubApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
    username: String,
    repo: String,
}

impl GitHubApi {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        username: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        let http: reqwest::Client = reqwest::Client::builder()
            // GitHub rejects requests without a User-Agent
            .user_agent(concat!("devops-agent/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client builds with static configuration");

        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
            username: username.into(),
            repo: repo.into(),
        }
    }

    /// Builds a client from GITHUB_* variables; all three of token,
    /// username and repo are required here.
    pub fn from_environment(env: &EnvironmentVariables) -> Result<Self> {
        let token: String = env
            .github_token
            .clone()
            .context("GITHUB_TOKEN is required for GitHub API operations")?;
        let username: String = env
            .github_username
            .clone()
            .context("GITHUB_USERNAME is not set")?;
        let repo: String = env.github_repo.clone().context("GITHUB_REPO is not set")?;

        Ok(Self::new(
            env.github_api_base_url.as_ref(),
            token,
            username,
            repo,
        ))
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.username, self.repo, suffix
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
    }

    /// Fetches the most recent commit, if the repository has any
    pub async fn latest_commit(&self) -> Result<Option<CommitInfo>> {
        let url: String = self.repo_path("/commits");
        let response: reqwest::Response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .context("GitHub commits request failed")?;

        if !response.status().is_success() {
            bail!("GitHub API returned {}", response.status());
        }

        let mut commits: Vec<CommitEntry> = response
            .json()
            .await
            .context("GitHub commits response was not valid JSON")?;

        if commits.is_empty() {
            return Ok(None);
        }

        let latest: CommitEntry = commits.remove(0);
        info!(
            "Latest commit verified: {} {}",
            &latest.sha[..latest.sha.len().min(7)],
            latest.commit.message.lines().next().unwrap_or_default()
        );

        Ok(Some(CommitInfo {
            sha: latest.sha,
            message: latest.commit.message,
            date: latest.commit.author.date,
        }))
    }

    /// Fetches repository metadata
    pub async fn repo_info(&self) -> Result<RepoInfo> {
        let url: String = self.repo_path("");
        let response: reqwest::Response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .context("GitHub repository request failed")?;

        if !response.status().is_success() {
            bail!("GitHub API returned {}", response.status());
        }

        let repo: RepoResponse = response
            .json()
            .await
            .context("GitHub repository response was not valid JSON")?;

        Ok(RepoInfo {
            name: repo.name,
            description: repo.description,
            url: repo.html_url,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            default_branch: repo.default_branch,
            last_push: repo.pushed_at,
        })
    }

    /// Creates an issue and returns its html url
    pub async fn create_issue(&self, title: &str, body: &str) -> Result<String> {
        let url: String = self.repo_path("/issues");
        let response: reqwest::Response = self
            .authorized(self.http.post(&url))
            .json(&json!({ "title": title, "body": body }))
            .send()
            .await
            .context("GitHub issue request failed")?;

        if response.status() != reqwest::StatusCode::CREATED {
            bail!("Failed to create issue: {}", response.status());
        }

        let issue: IssueResponse = response
            .json()
            .await
            .context("GitHub issue response was not valid JSON")?;

        info!("Issue created: {}", issue.html_url);
        Ok(issue.html_url)
    }
}
