//! Process launcher: builds and attaches to the devcontainer.
//!
//! All external commands go through [`LaunchCommand`], so what runs can be
//! inspected and printed without running it. The build runs behind a
//! spinner with the terminal in cooked mode; a Ctrl+C there is caught by the
//! handler from [`install_interrupt_handler`].

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, info, warn};

use crate::console::restore_terminal;
use crate::error::{WizardError, EXIT_CANCELLED, GOODBYE};
use crate::prompt::{Choice, Confirm, Select};
use crate::theme::Symbols;

/// Working directory command inside the container for the Terminal option.
pub const SHELL_ENTRY: &str = "cd /workspace && exec bash -l";

// ============================================================================
// Commands
// ============================================================================

/// Where to attach once the container is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OpenIn {
    Shell,
    Code,
    Cursor,
}

impl OpenIn {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Shell => "Terminal",
            Self::Code => "VS Code",
            Self::Cursor => "Cursor",
        }
    }

    /// Editor binary, if this option opens one.
    pub fn editor(&self) -> Option<&'static str> {
        match self {
            Self::Shell => None,
            Self::Code => Some("code"),
            Self::Cursor => Some("cursor"),
        }
    }

    /// Terminal and VS Code are always listed; Cursor only when on PATH.
    pub fn available() -> Vec<OpenIn> {
        Self::iter()
            .filter(|target| match target {
                Self::Cursor => which::which("cursor").is_ok(),
                _ => true,
            })
            .collect()
    }
}

/// An external command the launcher can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchCommand {
    /// `npx @devcontainers/cli up --config <json> --workspace-folder .`
    Up { config: PathBuf },
    /// `npx @devcontainers/cli exec --container-id <id> bash -lc '...'`
    Exec { container_id: String },
    /// `<editor> .`
    Open { editor: &'static str },
}

impl LaunchCommand {
    pub fn program(&self) -> &'static str {
        match self {
            Self::Up { .. } | Self::Exec { .. } => "npx",
            Self::Open { editor } => *editor,
        }
    }

    pub fn args(&self) -> Vec<String> {
        let owned = |args: &[&str]| args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        match self {
            Self::Up { config } => {
                let mut args = owned(&["@devcontainers/cli", "up", "--config"]);
                args.push(config.display().to_string());
                args.extend(owned(&["--workspace-folder", "."]));
                args
            }
            Self::Exec { container_id } => {
                let mut args = owned(&["@devcontainers/cli", "exec", "--container-id"]);
                args.push(container_id.clone());
                args.extend(owned(&["bash", "-lc", SHELL_ENTRY]));
                args
            }
            Self::Open { .. } => owned(&["."]),
        }
    }

    /// Shell-quoted command line, for printing.
    pub fn display(&self) -> String {
        let mut words = vec![self.program().to_string()];
        words.extend(self.args());
        shell_words::join(words)
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.args());
        cmd
    }
}

// ============================================================================
// devcontainer up
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpResult {
    outcome: String,
    #[serde(default)]
    container_id: Option<String>,
}

/// Container id from `devcontainer up` stdout.
///
/// The CLI may log before its result, so the JSON object is taken from the
/// first `{` to the last `}`.
pub fn parse_up_output(stdout: &str) -> crate::error::Result<String> {
    let (Some(start), Some(end)) = (stdout.find('{'), stdout.rfind('}')) else {
        return Err(WizardError::process(
            "Could not find JSON output from devcontainer CLI",
        ));
    };
    if end < start {
        return Err(WizardError::process(
            "Could not find JSON output from devcontainer CLI",
        ));
    }

    let result: UpResult = serde_json::from_str(&stdout[start..=end])?;
    match result.container_id.filter(|id| !id.is_empty()) {
        Some(id) if result.outcome == "success" => Ok(id),
        _ => Err(WizardError::process(format!(
            "Dev container setup failed (outcome: {})",
            result.outcome
        ))),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let mut frames: Vec<&str> = Symbols::SPINNER_FRAMES.to_vec();
    frames.push(Symbols::CHECK);
    let style = ProgressStyle::with_template("{spinner:.dim} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&frames);

    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(message.to_string());
    pb
}

/// Build and start the container. Returns its id.
pub fn devcontainer_up(config: &Path) -> Result<String> {
    let command = LaunchCommand::Up {
        config: config.to_path_buf(),
    };
    info!("Running {}", command.display());

    let pb = spinner("Building devcontainer...");
    let output = command
        .to_command()
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to run {}", command.program()));

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    if !output.status.success() {
        pb.finish_and_clear();
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WizardError::process(format!(
            "'devcontainer up' exited with {}:\n{}",
            output.status,
            stderr.trim()
        ))
        .into());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match parse_up_output(&stdout) {
        Ok(id) => {
            pb.finish_with_message("Devcontainer is up");
            debug!("Container id: {}", id);
            Ok(id)
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e).context("Unexpected output from devcontainer CLI")
        }
    }
}

// ============================================================================
// Attach
// ============================================================================

pub fn start_prompt() -> Confirm {
    Confirm::new("Would you like to start the devcontainer now?", true)
}

pub fn open_in_prompt(targets: &[OpenIn]) -> Select<OpenIn> {
    let choices = targets
        .iter()
        .map(|target| Choice::new(target.label(), *target))
        .collect();
    Select::new("Select an interface to attach to the devcontainer:", choices)
}

pub fn attach_command(target: OpenIn, container_id: &str) -> LaunchCommand {
    match target.editor() {
        Some(editor) => LaunchCommand::Open { editor },
        None => LaunchCommand::Exec {
            container_id: container_id.to_string(),
        },
    }
}

/// Run the attach command in the foreground. A non-zero exit is only logged.
pub fn attach(target: OpenIn, container_id: &str) -> Result<()> {
    let command = attach_command(target, container_id);
    info!("Running {}", command.display());

    let status = command
        .to_command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run {}", command.program()))?;

    if !status.success() {
        warn!("{} session exited with {}", target.label(), status);
    }
    Ok(())
}

/// What to run later when the user skips the build.
pub fn follow_up_command(config: &Path) -> String {
    LaunchCommand::Up {
        config: config.to_path_buf(),
    }
    .display()
}

/// Restore the cursor and exit 130 on Ctrl+C outside raw mode.
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        restore_terminal();
        eprintln!("\n{}", GOODBYE);
        std::process::exit(EXIT_CANCELLED);
    })
    .context("Failed to install Ctrl+C handler")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_up_output_with_logs() {
        let stdout = "[1 ms] Start: Run\nsome log\n{\"outcome\":\"success\",\"containerId\":\"abc123\",\"remoteUser\":\"vscode\"}\n";
        assert_eq!(parse_up_output(stdout).unwrap(), "abc123");
    }

    #[test]
    fn test_parse_up_output_failure_outcome() {
        let stdout = r#"{"outcome":"error","message":"boom"}"#;
        assert!(matches!(
            parse_up_output(stdout).unwrap_err(),
            WizardError::Process(_)
        ));
    }

    #[test]
    fn test_parse_up_output_without_json() {
        assert!(parse_up_output("no json here").is_err());
        assert!(parse_up_output("} backwards {").is_err());
    }

    #[test]
    fn test_parse_up_output_missing_container_id() {
        assert!(parse_up_output(r#"{"outcome":"success"}"#).is_err());
    }

    #[test]
    fn test_command_lines() {
        let up = LaunchCommand::Up {
            config: PathBuf::from(".devcontainer/my box/devcontainer.json"),
        };
        assert_eq!(
            up.display(),
            "npx @devcontainers/cli up --config '.devcontainer/my box/devcontainer.json' --workspace-folder ."
        );

        let exec = attach_command(OpenIn::Shell, "abc");
        assert_eq!(
            exec.args(),
            vec![
                "@devcontainers/cli",
                "exec",
                "--container-id",
                "abc",
                "bash",
                "-lc",
                SHELL_ENTRY
            ]
        );

        let code = attach_command(OpenIn::Code, "abc");
        assert_eq!(code.program(), "code");
        assert_eq!(code.args(), vec!["."]);
    }

    #[test]
    fn test_available_targets_start_with_terminal() {
        let targets = OpenIn::available();
        assert_eq!(targets[0], OpenIn::Shell);
        assert!(targets.contains(&OpenIn::Code));
    }

    #[test]
    fn test_start_prompt_shows_one_marker() {
        let mut console = crate::console::ScriptedConsole::new([crate::prompt::RawKey::enter()]);
        let answer = crate::prompt::ask(&mut console, start_prompt()).unwrap();
        assert_eq!(answer, crate::prompt::PromptResult::Value(true));
        let frame = console.frames()[0].clone();
        assert_eq!(frame.matches(Symbols::DIAMOND).count(), 1);
    }

    #[test]
    fn test_open_in_prompt_lists_targets() {
        let select = open_in_prompt(&[OpenIn::Shell, OpenIn::Code]);
        assert_eq!(select.active(), 0);
    }
}
