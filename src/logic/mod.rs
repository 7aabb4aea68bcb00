//! Logic modules: translate wizard answers into build artifacts.
//!
//! The logic layer is pure. [`compile`] turns a finished [`WizardState`] into
//! a [`BuildPlan`]; writing the plan to disk is the artifact writer's job.
//!
//! # Modules
//!
//! - `resolver` - tool selection to ordered install list
//! - `runtime` - hardening options to `docker run` flags
//! - `dockerfile` - instruction sequence
//! - `manifest` - `devcontainer.json` model

pub mod dockerfile;
pub mod manifest;
pub mod resolver;
pub mod runtime;

use tracing::debug;

use crate::error::Result;
use crate::types::{HardeningOption, ToolKey};
use crate::wizard::WizardState;

pub use manifest::Manifest;
pub use runtime::RuntimeDirectives;

/// Project name used when the state has none.
pub const DEFAULT_PROJECT_NAME: &str = "Web3 Dev Environment";

/// Everything needed to write and start the devcontainer.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub project_name: String,
    pub folder_name: String,
    /// Tools in install order.
    pub required_tools: Vec<ToolKey>,
    /// Effective hardening after conflict resolution.
    pub hardening: Vec<HardeningOption>,
    pub instructions: Vec<String>,
    pub manifest: Manifest,
}

impl BuildPlan {
    pub fn dockerfile(&self) -> String {
        dockerfile::render(&self.instructions)
    }

    pub fn manifest_json(&self) -> Result<String> {
        Ok(self.manifest.to_json()?)
    }
}

/// Folder-safe form of a project name.
///
/// Lowercased; runs of characters outside `[a-z0-9._-]` become `-`; leading
/// and trailing dashes are trimmed; empty becomes `default`.
pub fn safe_folder_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-') {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "default".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Compile a finished wizard state. Performs no I/O.
pub fn compile(state: &WizardState) -> Result<BuildPlan> {
    let project_name = state
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_PROJECT_NAME)
        .to_string();
    let folder_name = safe_folder_name(&project_name);

    let tools = resolver::required_tools(state)?;
    let required_tools = resolver::install_order(&tools);
    debug!(
        "Resolved {} tools: {:?}",
        required_tools.len(),
        required_tools
    );

    let runtime = runtime::directives(&runtime::parse_hardening(state.hardening())?);
    let repo = state.active_repository();
    let instructions = dockerfile::instructions(&required_tools, repo);

    let manifest = Manifest::assemble(manifest::ManifestInput {
        project_name: &project_name,
        folder_name: &folder_name,
        tools: &required_tools,
        extensions: resolver::resolve_extensions(state, &tools),
        runtime: &runtime,
        clones_repository: repo.is_some(),
    });

    Ok(BuildPlan {
        project_name,
        folder_name,
        required_tools,
        hardening: runtime.effective,
        instructions,
        manifest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::Answer;

    #[test]
    fn test_safe_folder_name() {
        assert_eq!(safe_folder_name("Web3 Dev Environment"), "web3-dev-environment");
        assert_eq!(safe_folder_name("  My!!Box  "), "my-box");
        assert_eq!(safe_folder_name("a.b_c-d"), "a.b_c-d");
        assert_eq!(safe_folder_name("***"), "default");
        assert_eq!(safe_folder_name("Ünïcode"), "n-code");
    }

    #[test]
    fn test_empty_state_compiles_minimal_plan() {
        let plan = compile(&WizardState::new()).unwrap();
        assert_eq!(plan.project_name, DEFAULT_PROJECT_NAME);
        assert_eq!(plan.folder_name, "web3-dev-environment");
        assert!(plan.required_tools.is_empty());
        assert!(plan.manifest.run_args.is_empty());
    }

    #[test]
    fn test_unknown_key_fails_compile() {
        let mut state = WizardState::new();
        state.commit(Answer::Hardening {
            options: vec!["teleport".to_string()],
            profile: None,
        });
        assert!(compile(&state).is_err());
    }
}
