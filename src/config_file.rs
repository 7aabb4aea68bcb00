//! Saved wizard answers.
//!
//! A finished [`WizardState`] can be written as JSON and fed back with
//! `create --config`, which pre-populates every prompt with the saved answer.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::error::WizardError;
use crate::logic::{resolver, runtime};
use crate::profiles::SecurityProfile;
use crate::prompt::Verdict;
use crate::wizard::steps::{validate_branch, validate_name, validate_repository_url};
use crate::wizard::WizardState;

impl WizardState {
    /// Save answers to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize answers to JSON")?;

        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        fs::write(&path, json)
            .with_context(|| format!("Failed to write answers to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load answers from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read answers from {:?}", path.as_ref()))?;

        let state: Self = serde_json::from_str(&content)
            .map_err(|e| WizardError::config(format!("Failed to parse answers JSON: {}", e)))?;

        Ok(state)
    }

    /// Check every key against the catalogs and the hardening set for conflicts
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if let Verdict::Reject(reason) = validate_name(name) {
                anyhow::bail!("Invalid name: {}", reason);
            }
        }

        resolver::required_tools(self).context("Invalid tool selection")?;

        let options =
            runtime::parse_hardening(self.hardening()).context("Invalid hardening selection")?;
        let effective = runtime::resolve_conflicts(&options);
        let mut requested = options.clone();
        requested.sort();
        requested.dedup();
        if effective != requested {
            let dropped: Vec<String> = requested
                .iter()
                .filter(|o| !effective.contains(o))
                .map(|o| o.to_string())
                .collect();
            return Err(WizardError::validation(format!(
                "Conflicting hardening options: {} cannot be combined with the rest",
                dropped.join(", ")
            ))
            .into());
        }

        if let Some(profile) = &self.hardening_profile {
            SecurityProfile::from_str(profile)
                .map_err(|_| anyhow::anyhow!("Unknown security profile: {}", profile))?;
        }

        if self.vscode_extensions().iter().any(|e| e.trim().is_empty()) {
            anyhow::bail!("VS Code extension ids cannot be empty");
        }

        if let Some(repo) = self.git_repository.as_ref().filter(|r| r.enabled) {
            if let Verdict::Reject(reason) = validate_repository_url(&repo.url) {
                anyhow::bail!("Invalid git repository: {}", reason);
            }
            if let Some(branch) = &repo.branch {
                if let Verdict::Reject(reason) = validate_branch(branch) {
                    anyhow::bail!("Invalid git branch: {}", reason);
                }
            }
        }

        Ok(())
    }
}
