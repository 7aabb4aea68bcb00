//! Accumulated wizard answers.
//!
//! `None` means the step has not been answered yet. The controller is the
//! only writer; steps read the slice they need to pre-populate their prompt.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Repository cloned into the image at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepository {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub enabled: bool,
}

impl GitRepository {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a clone directive should be emitted.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.url.trim().is_empty()
    }
}

/// Every answer the wizard collects. Serialized as the saved-answers file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frameworks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzing_and_testing: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_tooling: Option<Vec<String>>,
    /// Hardening option keys, from manual selection or profile expansion.
    #[serde(rename = "systemHardening", skip_serializing_if = "Option::is_none")]
    pub hardening: Option<Vec<String>>,
    /// Profile the hardening set was expanded from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardening_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vscode_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<GitRepository>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_path: Option<PathBuf>,
}

/// The value one step commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Name(String),
    Languages(Vec<String>),
    Frameworks(Vec<String>),
    FuzzingAndTesting(Vec<String>),
    SecurityTooling(Vec<String>),
    Hardening {
        options: Vec<String>,
        profile: Option<String>,
    },
    VscodeExtensions(Vec<String>),
    GitRepository(GitRepository),
    SavePath(PathBuf),
}

fn slice(field: &Option<Vec<String>>) -> &[String] {
    field.as_deref().unwrap_or_default()
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one step's answer.
    pub fn commit(&mut self, answer: Answer) {
        match answer {
            Answer::Name(name) => self.name = Some(name),
            Answer::Languages(v) => self.languages = Some(v),
            Answer::Frameworks(v) => self.frameworks = Some(v),
            Answer::FuzzingAndTesting(v) => self.fuzzing_and_testing = Some(v),
            Answer::SecurityTooling(v) => self.security_tooling = Some(v),
            Answer::Hardening { options, profile } => {
                self.hardening = Some(options);
                self.hardening_profile = profile;
            }
            Answer::VscodeExtensions(v) => self.vscode_extensions = Some(v),
            Answer::GitRepository(repo) => self.git_repository = Some(repo),
            Answer::SavePath(path) => self.save_path = Some(path),
        }
    }

    pub fn languages(&self) -> &[String] {
        slice(&self.languages)
    }

    pub fn frameworks(&self) -> &[String] {
        slice(&self.frameworks)
    }

    pub fn fuzzing_and_testing(&self) -> &[String] {
        slice(&self.fuzzing_and_testing)
    }

    pub fn security_tooling(&self) -> &[String] {
        slice(&self.security_tooling)
    }

    pub fn hardening(&self) -> &[String] {
        slice(&self.hardening)
    }

    pub fn vscode_extensions(&self) -> &[String] {
        slice(&self.vscode_extensions)
    }

    /// Clone directive, only when enabled with a URL.
    pub fn active_repository(&self) -> Option<&GitRepository> {
        self.git_repository.as_ref().filter(|r| r.is_active())
    }
}
