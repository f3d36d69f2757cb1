// Workspace installer: prerequisite gate, idempotent workspace
// directory, template emission.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::github::push::git_available;

pub mod templates;

/// Directory holding agent state (activity log, backups)
pub const WORKSPACE_DIR: &str = ".devops-agent";

/// What a setup run did, for operator output
#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    pub workspace_created: bool,
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Scaffolds `target`: checks for git, creates the workspace directory
/// once, and emits the template files that are not already present.
pub async fn run_setup(target: &Path) -> Result<SetupReport> {
    apply(target, git_available().await)
}

// The prerequisite gate comes first: when git is missing nothing may be
// created. Split out so tests can drive both sides of the gate.
fn apply(target: &Path, git_present: bool) -> Result<SetupReport> {
    if !git_present {
        bail!("Git is not installed. Install from https://git-scm.com/ and re-run setup.");
    }

    let mut report: SetupReport = SetupReport::default();

    let workspace: PathBuf = target.join(WORKSPACE_DIR);
    if workspace.is_dir() {
        info!("Workspace already present, skipping: {}", workspace.display());
    } else {
        fs::create_dir_all(&workspace)
            .with_context(|| format!("could not create {}", workspace.display()))?;
        report.workspace_created = true;
    }

    for (name, content) in templates::TEMPLATES {
        let path: PathBuf = target.join(name);

        if path.exists() {
            report.skipped.push(name.to_string());
            continue;
        }

        fs::write(&path, content)
            .with_context(|| format!("could not write {}", path.display()))?;
        report.written.push(name.to_string());
    }

    info!(
        "Setup complete: {} written, {} skipped",
        report.written.len(),
        report.skipped.len()
    );

    Ok(report)
}
