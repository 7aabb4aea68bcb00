//! Artifact writer.
//!
//! Takes a compiled [`BuildPlan`] and writes `Dockerfile` and
//! `devcontainer.json` under `<save path>/.devcontainer/<folder>/`. Nothing
//! is written until the wizard has finished, so a cancelled run leaves no
//! partial files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::logic::BuildPlan;
use crate::theme::Symbols;
use crate::wizard::WizardState;

pub const DOCKERFILE: &str = "Dockerfile";
pub const MANIFEST_FILE: &str = "devcontainer.json";

/// Where the artifacts of one plan were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub directory: PathBuf,
    pub dockerfile: PathBuf,
    pub manifest: PathBuf,
}

/// `<save path>/.devcontainer/<folder>`
pub fn output_dir(save_path: &Path, folder_name: &str) -> PathBuf {
    save_path.join(".devcontainer").join(folder_name)
}

/// Write both artifacts, creating the directory as needed.
pub fn write_artifacts(plan: &BuildPlan, save_path: &Path) -> Result<WrittenArtifacts> {
    let directory = output_dir(save_path, &plan.folder_name);
    fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create directory {:?}", directory))?;

    let dockerfile = directory.join(DOCKERFILE);
    fs::write(&dockerfile, plan.dockerfile())
        .with_context(|| format!("Failed to write {:?}", dockerfile))?;
    info!("Dockerfile written to {}", dockerfile.display());

    let manifest = directory.join(MANIFEST_FILE);
    let json = plan
        .manifest_json()
        .context("Failed to serialize devcontainer.json")?;
    fs::write(&manifest, json).with_context(|| format!("Failed to write {:?}", manifest))?;
    info!("devcontainer.json written to {}", manifest.display());

    Ok(WrittenArtifacts {
        directory,
        dockerfile,
        manifest,
    })
}

/// Both artifacts as one printable document, for `--dry-run`.
pub fn render_dry_run(plan: &BuildPlan) -> Result<String> {
    let json = plan
        .manifest_json()
        .context("Failed to serialize devcontainer.json")?;
    Ok(format!(
        "# ---- {} ----\n{}\n# ---- {} ----\n{}",
        DOCKERFILE,
        plan.dockerfile(),
        MANIFEST_FILE,
        json
    ))
}

fn joined_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "None".to_string()
    } else {
        values.join(", ")
    }
}

/// Generation summary printed after writing.
pub fn summary_lines(state: &WizardState, plan: &BuildPlan, location: &Path) -> Vec<String> {
    let mut lines = vec![
        format!("{} Generation Summary:", Symbols::DIAMOND),
        format!("   Project: {}", plan.project_name),
        format!("   Location: {}", location.display()),
        format!("   Languages: {}", joined_or_none(state.languages())),
        format!("   Frameworks: {}", joined_or_none(state.frameworks())),
        format!("   Security Tools: {}", joined_or_none(state.security_tooling())),
        format!("   Testing Tools: {}", joined_or_none(state.fuzzing_and_testing())),
        format!(
            "   VS Code Extensions: {} extensions",
            plan.manifest.customizations.vscode.extensions.len()
        ),
    ];

    if plan.required_tools.is_empty() {
        lines.push(format!(
            "   {} No tools selected - minimal environment",
            Symbols::TRIANGLE
        ));
    }
    if !plan.hardening.is_empty() {
        let keys: Vec<String> = plan.hardening.iter().map(|o| o.to_string()).collect();
        lines.push(format!("   Security Hardening: {}", keys.join(", ")));
    }
    if let Some(repo) = state.active_repository() {
        let branch = repo
            .branch
            .as_deref()
            .map(|b| format!(" ({})", b))
            .unwrap_or_default();
        lines.push(format!("   Git Repository: {}{}", repo.url, branch));
    }
    lines
}
