//! `devcontainer.json` model.
//!
//! Field order follows the serialized layout. Maps are `BTreeMap` so the
//! output is byte-stable for equal input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::runtime::RuntimeDirectives;
use crate::types::{HardeningOption, ToolKey};

pub const REMOTE_USER: &str = "vscode";
pub const WORKSPACE_FOLDER: &str = "/workspace";

/// Copies the build-time clone into the workspace.
pub const POST_CREATE_CLONE: &str =
    "mkdir -p /workspace/repo && cp -r /home/vscode/repos/project/* /workspace/repo";

const FEATURES: [&str; 2] = [
    "ghcr.io/devcontainers/features/git:1",
    "ghcr.io/devcontainers/features/github-cli:1",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub dockerfile: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VscodeCustomization {
    pub extensions: Vec<String>,
    pub settings: BTreeMap<String, Value>,
}

/// What the wizard resolved, for tooling that reads the manifest back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardCustomization {
    pub tools: Vec<String>,
    pub hardening: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customizations {
    pub vscode: VscodeCustomization,
    #[serde(rename = "devcontainer-wizard")]
    pub wizard: WizardCustomization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub build: Build,
    pub remote_user: String,
    pub features: BTreeMap<String, Value>,
    pub container_env: BTreeMap<String, String>,
    pub customizations: Customizations,
    pub initialize_command: String,
    pub post_start_command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_create_command: Option<String>,
    pub workspace_folder: String,
    pub workspace_mount: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_args: Vec<String>,
}

/// Inputs the manifest is assembled from.
pub struct ManifestInput<'a> {
    pub project_name: &'a str,
    pub folder_name: &'a str,
    pub tools: &'a [ToolKey],
    pub extensions: Vec<String>,
    pub runtime: &'a RuntimeDirectives,
    pub clones_repository: bool,
}

fn base_settings() -> BTreeMap<String, Value> {
    let mut settings = BTreeMap::new();
    settings.insert(
        "terminal.integrated.defaultProfile.linux".to_string(),
        json!("zsh"),
    );
    settings.insert(
        "terminal.integrated.profiles.linux".to_string(),
        json!({ "zsh": { "path": "/bin/zsh" } }),
    );
    settings
}

fn security_settings(settings: &mut BTreeMap<String, Value>) {
    settings.insert("task.autoDetect".to_string(), json!("off"));
    settings.insert("task.allowAutomaticTasks".to_string(), json!("off"));
    settings.insert("security.workspace.trust.enabled".to_string(), json!(false));
    settings.insert("telemetry.telemetryLevel".to_string(), json!("off"));
}

impl Manifest {
    pub fn assemble(input: ManifestInput<'_>) -> Self {
        let mut settings = base_settings();
        if input.runtime.vscode_security {
            security_settings(&mut settings);
        }

        let features = FEATURES
            .iter()
            .map(|f| (f.to_string(), json!({})))
            .collect();

        let mut container_env = BTreeMap::new();
        container_env.insert("SHELL".to_string(), "/bin/zsh".to_string());
        container_env.insert(
            "DEVCONTAINER_ID_LABEL".to_string(),
            format!("{}-web3-devcontainer", input.folder_name),
        );

        Self {
            name: input.project_name.to_string(),
            build: Build {
                dockerfile: "Dockerfile".to_string(),
            },
            remote_user: REMOTE_USER.to_string(),
            features,
            container_env,
            customizations: Customizations {
                vscode: VscodeCustomization {
                    extensions: input.extensions,
                    settings,
                },
                wizard: WizardCustomization {
                    tools: input.tools.iter().map(|t| t.to_string()).collect(),
                    hardening: input
                        .runtime
                        .effective
                        .iter()
                        .map(HardeningOption::to_string)
                        .collect(),
                },
            },
            // Runs on the host; the name is user input.
            initialize_command: format!(
                "echo {}",
                shell_words::quote(&format!(
                    "Initializing {} dev container...",
                    input.project_name
                ))
            ),
            post_start_command: "echo '🚀 Dev container is ready for Web3 development!'"
                .to_string(),
            post_create_command: input
                .clones_repository
                .then(|| POST_CREATE_CLONE.to_string()),
            workspace_folder: WORKSPACE_FOLDER.to_string(),
            workspace_mount: input.runtime.workspace_mount.to_string(),
            run_args: input.runtime.run_args.clone(),
        }
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}
