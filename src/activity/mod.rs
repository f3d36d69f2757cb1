// JSON-file activity log and its dashboard summary

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::scaffold::WORKSPACE_DIR;

pub const ACTIVITY_LOG_FILE: &str = "activity_log.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
    pub data: Value,
}

#[derive(Debug, Clone, Default)]
pub struct ActivitySummary {
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
    pub last: Option<ActivityEntry>,
}

/// Append-only activity log stored in the agent workspace
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log of the workspace rooted at `dir`
    pub fn in_workspace(dir: &Path) -> Self {
        Self::new(dir.join(WORKSPACE_DIR).join(ACTIVITY_LOG_FILE))
    }

    pub fn entries(&self) -> Result<Vec<ActivityEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content: String = fs::read_to_string(&self.path)
            .with_context(|| format!("could not read {}", self.path.display()))?;
        let entries: Vec<ActivityEntry> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a valid activity log", self.path.display()))?;

        Ok(entries)
    }

    /// Appends one entry, creating the workspace directory on demand
    pub fn record(&self, kind: &str, data: Value) -> Result<()> {
        let mut entries: Vec<ActivityEntry> = self.entries()?;

        entries.push(ActivityEntry {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            data,
        });

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }

        let rendered: String =
            serde_json::to_string_pretty(&entries).context("could not serialize activity log")?;
        fs::write(&self.path, rendered)
            .with_context(|| format!("could not write {}", self.path.display()))?;

        Ok(())
    }

    pub fn summary(&self) -> Result<ActivitySummary> {
        let entries: Vec<ActivityEntry> = self.entries()?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &entries {
            *counts.entry(entry.kind.clone()).or_insert(0) += 1;
        }

        Ok(ActivitySummary {
            counts,
            total: entries.len(),
            last: entries.last().cloned(),
        })
    }
}
