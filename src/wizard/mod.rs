//! Wizard flow controller.
//!
//! - `state` - the answer aggregate and per-step answers
//! - `steps` - prompt builders and validators per step
//! - `hardening` - the compound hardening step
//!
//! The controller owns the [`WizardState`] and a cursor into [`WizardStep`].
//! A step resolving with a value commits it and advances; Back moves the
//! cursor one step back without committing, and the earlier answer is offered
//! again as that step's default.

pub mod hardening;
pub mod state;
pub mod steps;

pub use state::{Answer, GitRepository, WizardState};

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::console::Console;
use crate::error::Result;
use crate::prompt::{ask, PromptResult};
use crate::types::ToolCategory;

// ============================================================================
// Steps
// ============================================================================

/// Wizard steps in the order they run.
///
/// ```text
/// Name -> Languages -> Frameworks -> FuzzingAndTesting -> SecurityTooling
///      -> Hardening -> VscodeExtensions -> GitClone -> SavePath
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Name,
    Languages,
    Frameworks,
    FuzzingAndTesting,
    SecurityTooling,
    Hardening,
    VscodeExtensions,
    GitClone,
    SavePath,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        Self::Name,
        Self::Languages,
        Self::Frameworks,
        Self::FuzzingAndTesting,
        Self::SecurityTooling,
        Self::Hardening,
        Self::VscodeExtensions,
        Self::GitClone,
        Self::SavePath,
    ];

    pub const TOTAL_STEPS: usize = Self::ALL.len();

    /// Step at a zero-based cursor position.
    pub fn at(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-based cursor position.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Returns `None` after the last step.
    pub fn next(&self) -> Option<Self> {
        Self::at(self.index() + 1)
    }

    /// Returns `None` on the first step.
    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::at)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Name => "Devcontainer Name",
            Self::Languages => "Languages",
            Self::Frameworks => "Frameworks",
            Self::FuzzingAndTesting => "Fuzzing & Testing",
            Self::SecurityTooling => "Security Tooling",
            Self::Hardening => "Security Hardening",
            Self::VscodeExtensions => "VS Code Extensions",
            Self::GitClone => "Git Repository",
            Self::SavePath => "Save Location",
        }
    }

    /// 1-indexed for display.
    pub fn step_number(&self) -> usize {
        self.index() + 1
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Sequences the steps against a console.
pub struct Wizard {
    preset_name: Option<String>,
    cwd: PathBuf,
}

impl Wizard {
    /// `cwd` seeds the default name and resolves relative save paths.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            preset_name: None,
            cwd: cwd.into(),
        }
    }

    /// Answer the name step without prompting.
    pub fn with_preset_name(mut self, name: Option<String>) -> Self {
        self.preset_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Run every step, starting from `initial` answers.
    pub fn run(&self, console: &mut dyn Console, initial: WizardState) -> Result<WizardState> {
        let mut state = initial;
        let mut cursor = 0;

        while let Some(step) = WizardStep::at(cursor) {
            debug!(
                "Wizard step {}/{}: {}",
                step.step_number(),
                WizardStep::TOTAL_STEPS,
                step.title()
            );

            match self.execute(step, console, &state)? {
                PromptResult::Value(answer) => {
                    state.commit(answer);
                    cursor += 1;
                }
                PromptResult::Back => {
                    // Back on the first step stays put.
                    cursor = cursor.saturating_sub(1);
                    debug!("Back to step {}", cursor + 1);
                }
            }
        }

        debug!("Wizard complete");
        Ok(state)
    }

    /// Run one step. Only reads `state`.
    pub fn execute(
        &self,
        step: WizardStep,
        console: &mut dyn Console,
        state: &WizardState,
    ) -> Result<PromptResult<Answer>> {
        let answer = match step {
            WizardStep::Name => {
                if let Some(name) = &self.preset_name {
                    return Ok(PromptResult::Value(Answer::Name(name.clone())));
                }
                let prompt = steps::name_prompt(state.name.as_deref(), &self.cwd);
                ask(console, prompt)?.map(Answer::Name)
            }
            WizardStep::Languages => {
                ask(console, steps::languages_prompt(state.languages()))?.map(Answer::Languages)
            }
            WizardStep::Frameworks => ask(
                console,
                steps::tools_prompt(ToolCategory::Framework, state.frameworks()),
            )?
            .map(Answer::Frameworks),
            WizardStep::FuzzingAndTesting => ask(
                console,
                steps::tools_prompt(ToolCategory::FuzzingAndTesting, state.fuzzing_and_testing()),
            )?
            .map(Answer::FuzzingAndTesting),
            WizardStep::SecurityTooling => ask(
                console,
                steps::tools_prompt(ToolCategory::SecurityTooling, state.security_tooling()),
            )?
            .map(Answer::SecurityTooling),
            WizardStep::Hardening => hardening::run(console, state)?,
            WizardStep::VscodeExtensions => {
                steps::run_extensions(console, state.vscode_extensions.as_deref())?
            }
            WizardStep::GitClone => steps::run_git_clone(console, state.git_repository.as_ref())?,
            WizardStep::SavePath => {
                let prompt = steps::save_path_prompt(state.save_path.as_deref(), &self.cwd);
                ask(console, prompt)?
                    .map(|typed| Answer::SavePath(steps::resolve_save_path(&typed, &self.cwd)))
            }
        };
        Ok(answer)
    }
}
