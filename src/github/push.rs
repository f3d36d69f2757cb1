// Git subprocess automation: repository bootstrap and auto-push

use std::path::PathBuf;
use std::process::Output;

use anyhow::{bail, Context, Result};
use chrono::Local;
use serde::Serialize;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::environment::EnvironmentVariables;

/// True when a `git` binary is resolvable on PATH
pub async fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Result of a commit-and-push run, serialized for operator output
#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
    pub success: bool,
    pub committed: bool,
    pub pushed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Drives `git` in a working directory against one GitHub repository
#[derive(Debug, Clone)]
pub struct GitPusher {
    pub username: String,
    pub repo: String,
    token: Option<String>,
    workdir: PathBuf,
}

impl GitPusher {
    pub fn new(
        username: impl Into<String>,
        repo: impl Into<String>,
        token: Option<String>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            username: username.into(),
            repo: repo.into(),
            token,
            workdir: workdir.into(),
        }
    }

    /// Builds a pusher from GITHUB_* variables; username and repo are
    /// required, the token is optional but pushes will likely fail
    /// without it.
    pub fn from_environment(env: &EnvironmentVariables, workdir: impl Into<PathBuf>) -> Result<Self> {
        let username: String = env
            .github_username
            .clone()
            .context("GITHUB_USERNAME is not set")?;
        let repo: String = env.github_repo.clone().context("GITHUB_REPO is not set")?;

        if env.github_token.is_none() {
            warn!("GITHUB_TOKEN not set. Some operations may fail.");
        }

        Ok(Self::new(username, repo, env.github_token.clone(), workdir))
    }

    pub fn remote_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.username, self.repo)
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.username, self.repo)
    }

    async fn git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .await
            .with_context(|| format!("failed to execute git {:?}", args))
    }

    /// Runs a git command and turns non-zero exits into errors carrying
    /// stderr, the way interactive git surfaces them
    async fn git_checked(&self, args: &[&str]) -> Result<String> {
        let output: Output = self.git(args).await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            bail!(
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
    }

    pub async fn is_repo(&self) -> bool {
        self.git(&["rev-parse", "--git-dir"])
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Initializes the repository and wires the origin remote.
    /// Already-initialized directories are left untouched.
    pub async fn init_repo(&self) -> Result<()> {
        if !git_available().await {
            bail!("Git is not installed. Install from https://git-scm.com/");
        }

        if self.is_repo().await {
            info!("Git repository already initialized");
            return Ok(());
        }

        info!("Initializing git repository");
        self.git_checked(&["init"]).await?;
        self.git_checked(&["branch", "-M", "main"]).await?;

        let remote_url: String = self.remote_url();
        self.git_checked(&["remote", "add", "origin", &remote_url]).await?;

        info!("Git repository initialized");
        Ok(())
    }

    /// Stages everything, commits and pushes to origin/main.
    /// A clean tree short-circuits without committing.
    pub async fn commit_and_push(&self, message: Option<String>) -> Result<PushOutcome> {
        let message: String = message.unwrap_or_else(|| {
            format!("Auto-update: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))
        });

        let status: String = self.git_checked(&["status", "--porcelain"]).await?;
        if status.trim().is_empty() {
            return Ok(PushOutcome {
                success: true,
                committed: false,
                pushed: false,
                message: "No changes to commit".to_string(),
                commit_message: None,
                repo_url: None,
                error: None,
            });
        }

        info!("Staging changes");
        self.git_checked(&["add", "."]).await?;

        info!("Committing: {}", message);
        self.git_checked(&["commit", "-m", &message]).await?;

        if let Some(token) = &self.token {
            // Token-authenticated remote so the push needs no credential helper
            let authenticated_url: String = format!(
                "https://{}@github.com/{}/{}.git",
                token, self.username, self.repo
            );
            self.git_checked(&["remote", "set-url", "origin", &authenticated_url])
                .await?;
        }

        info!("Pushing to GitHub");
        let push: Output = self.git(&["push", "-u", "origin", "main"]).await?;

        if push.status.success() {
            info!("Successfully pushed to GitHub");
            Ok(PushOutcome {
                success: true,
                committed: true,
                pushed: true,
                message: "Changes pushed successfully".to_string(),
                commit_message: Some(message),
                repo_url: Some(self.html_url()),
                error: None,
            })
        } else {
            let stderr: String = String::from_utf8_lossy(&push.stderr).to_string();
            warn!("Push failed: {}", stderr.trim());
            Ok(PushOutcome {
                success: false,
                committed: true,
                pushed: false,
                message: "Push failed".to_string(),
                commit_message: Some(message),
                repo_url: None,
                error: Some(stderr),
            })
        }
    }
}
