// Credential vault persisted as credentials.json.
// Records are written by external tooling; this side only reads them to
// prefill the wizard and to render .env content.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VAULT_FILE: &str = "credentials.json";

/// One extracted credential: which service it belongs to, the key name
/// within that service, and the secret value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub service: String,
    pub key_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct CredentialVault {
    records: Vec<CredentialRecord>,
}

impl CredentialVault {
    /// Loads the vault; a missing file is an empty vault, not an error
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content: String = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let records: Vec<CredentialRecord> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a valid credential vault", path.display()))?;

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flattens records to environment-style keys: SERVICE_KEYNAME.
    /// Later records win on collision, matching insertion-order maps.
    pub fn env_map(&self) -> BTreeMap<String, String> {
        self.records
            .iter()
            .map(|record| {
                (
                    format!(
                        "{}_{}",
                        record.service.to_uppercase(),
                        record.key_name.to_uppercase()
                    ),
                    record.value.clone(),
                )
            })
            .collect()
    }

    /// Looks up a single flattened key
    pub fn get(&self, env_key: &str) -> Option<String> {
        self.env_map().get(env_key).cloned()
    }

    /// Renders the vault as .env lines, one KEY=VALUE per record
    pub fn env_format(&self) -> String {
        let mut out: String = String::new();
        for (key, value) in self.env_map() {
            out.push_str(&key);
            out.push('=');
            out.push_str(&value);
            out.push('\n');
        }
        out
    }
}
