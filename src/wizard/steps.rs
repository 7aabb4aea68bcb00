//! Prompt builders and validators for the individual wizard steps.
//!
//! Builders are pure: they take the prior answer for the step and return a
//! configured prompt. The `run_*` functions cover steps that need more than
//! one prompt interaction.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use super::state::{Answer, GitRepository};
use crate::console::Console;
use crate::error::Result;
use crate::prompt::{ask, Checkbox, Choice, Confirm, PromptResult, TextInput, Verdict};
use crate::types::{Language, ToolCategory, ToolKey, RECOMMENDED_EXTENSIONS};

use strum::IntoEnumIterator;

pub const DEFAULT_NAME: &str = "Devcontainer";
pub const MAX_NAME_LEN: usize = 80;
pub const DEFAULT_BRANCH: &str = "main";

const GIT_URL_PREFIXES: [&str; 4] = ["https://", "git@", "ssh://", "git://"];

// ============================================================================
// Name
// ============================================================================

/// Prior answer, else the working directory name, else [`DEFAULT_NAME`].
pub fn default_name(prior: Option<&str>, cwd: &Path) -> String {
    let candidate = match prior {
        Some(name) => name.to_string(),
        None => cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let unusable = candidate.chars().all(|c| c == '.' || c.is_whitespace());
    if unusable {
        DEFAULT_NAME.to_string()
    } else {
        candidate
    }
}

pub fn validate_name(value: &str) -> Verdict {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Verdict::reject("Name cannot be empty")
    } else if trimmed.chars().count() > MAX_NAME_LEN {
        Verdict::reject(format!("Name is too long (max {} chars)", MAX_NAME_LEN))
    } else {
        Verdict::Accept
    }
}

pub fn name_prompt(prior: Option<&str>, cwd: &Path) -> TextInput {
    TextInput::new("Name your devcontainer:")
        .with_default(default_name(prior, cwd))
        .with_validator(|value| Ok(validate_name(value)))
}

// ============================================================================
// Selection checkboxes
// ============================================================================

fn was_selected(prior: &[String], key: &str) -> bool {
    prior.iter().any(|p| p == key)
}

pub fn languages_prompt(prior: &[String]) -> Checkbox<String> {
    let choices = Language::iter()
        .map(|language| {
            let key = language.to_string();
            Choice::new(language.label(), key.clone())
                .with_description(language.description())
                .preselected(was_selected(prior, &key))
        })
        .collect();

    Checkbox::new("Select smart contract languages", choices).allow_back(true)
}

pub fn tools_prompt(category: ToolCategory, prior: &[String]) -> Checkbox<String> {
    let message = match category {
        ToolCategory::Framework => "Select frameworks",
        ToolCategory::FuzzingAndTesting => "Select fuzzing and testing tools",
        ToolCategory::SecurityTooling => "Select security tooling",
    };

    // Keys only accepted from saved answers stay listed once chosen.
    let choices = ToolKey::iter()
        .filter(|tool| tool.category() == Some(category))
        .filter(|tool| tool.offered() || was_selected(prior, &tool.to_string()))
        .map(|tool| {
            let key = tool.to_string();
            Choice::new(tool.label(), key.clone())
                .with_description(tool.description())
                .preselected(was_selected(prior, &key))
        })
        .collect();

    Checkbox::new(message, choices).allow_back(true)
}

// ============================================================================
// VS Code extensions
// ============================================================================

pub fn recommended_extensions() -> Vec<String> {
    RECOMMENDED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Confirm for the recommended set, else hand-pick from it.
pub fn run_extensions(
    console: &mut dyn Console,
    prior: Option<&[String]>,
) -> Result<PromptResult<Answer>> {
    let recommended = recommended_extensions();
    let default = prior.is_none_or(|p| p == recommended.as_slice());

    let confirm = Confirm::new(
        "Do you want to automatically install recommended VS Code extensions?",
        default,
    )
    .allow_back(true);
    let PromptResult::Value(auto) = ask(console, confirm)? else {
        return Ok(PromptResult::Back);
    };
    if auto {
        return Ok(PromptResult::Value(Answer::VscodeExtensions(recommended)));
    }

    let prior = prior.unwrap_or_default();
    let saved: Vec<&String> = prior.iter().filter(|ext| !recommended.contains(ext)).collect();
    let mut choices = Vec::new();
    if !saved.is_empty() {
        choices.push(Choice::separator("Saved"));
        choices.extend(
            saved
                .into_iter()
                .map(|ext| Choice::new(ext.clone(), ext.clone()).preselected(true)),
        );
    }
    choices.push(Choice::separator("Recommended"));
    choices.extend(recommended.iter().map(|ext| {
        Choice::new(ext.clone(), ext.clone()).preselected(was_selected(prior, ext))
    }));

    let checkbox = Checkbox::new("Select VS Code extensions to install", choices).allow_back(true);
    Ok(ask(console, checkbox)?.map(Answer::VscodeExtensions))
}

// ============================================================================
// Git clone
// ============================================================================

pub fn validate_repository_url(value: &str) -> Verdict {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Verdict::reject("Repository URL cannot be empty")
    } else if !GIT_URL_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        Verdict::reject("Please enter a valid git repository URL (https://, git@, ssh://, or git://)")
    } else {
        Verdict::Accept
    }
}

pub fn validate_branch(value: &str) -> Verdict {
    if value.trim().is_empty() {
        Verdict::reject("Branch/tag name cannot be empty")
    } else {
        Verdict::Accept
    }
}

/// Confirm, URL, optional branch. Back at any point leaves the step.
pub fn run_git_clone(
    console: &mut dyn Console,
    prior: Option<&GitRepository>,
) -> Result<PromptResult<Answer>> {
    let enabled = prior.is_some_and(|r| r.enabled);
    let confirm = Confirm::new(
        "Would you like to automatically clone a git repository during build?",
        enabled,
    )
    .allow_back(true);
    let PromptResult::Value(clone) = ask(console, confirm)? else {
        return Ok(PromptResult::Back);
    };
    if !clone {
        return Ok(PromptResult::Value(Answer::GitRepository(
            GitRepository::disabled(),
        )));
    }

    let mut url_input = TextInput::new("Enter the git repository URL to clone:")
        .with_validator(|value| Ok(validate_repository_url(value)))
        .allow_back(true);
    if let Some(url) = prior.map(|r| r.url.as_str()).filter(|u| !u.is_empty()) {
        url_input = url_input.with_default(url);
    }
    let PromptResult::Value(url) = ask(console, url_input)? else {
        return Ok(PromptResult::Back);
    };

    let prior_branch = prior.and_then(|r| r.branch.as_deref());
    let confirm = Confirm::new(
        "Would you like to specify a specific branch/tag to clone?",
        prior_branch.is_some(),
    )
    .allow_back(true);
    let PromptResult::Value(pick_branch) = ask(console, confirm)? else {
        return Ok(PromptResult::Back);
    };

    let branch = if pick_branch {
        let input = TextInput::new("Enter the branch or tag name:")
            .with_default(prior_branch.unwrap_or(DEFAULT_BRANCH))
            .with_validator(|value| Ok(validate_branch(value)))
            .allow_back(true);
        match ask(console, input)? {
            PromptResult::Value(branch) => Some(branch),
            PromptResult::Back => return Ok(PromptResult::Back),
        }
    } else {
        None
    };

    Ok(PromptResult::Value(Answer::GitRepository(GitRepository {
        url,
        branch,
        enabled: true,
    })))
}

// ============================================================================
// Save path
// ============================================================================

/// Absolute path for a typed save location. Empty means `cwd`.
pub fn resolve_save_path(value: &str, cwd: &Path) -> PathBuf {
    let trimmed = value.trim();
    let joined = if trimmed.is_empty() {
        cwd.to_path_buf()
    } else {
        cwd.join(trimmed)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Missing paths are fine; they are created when the files are written.
pub fn validate_save_path(value: &str, cwd: &Path) -> anyhow::Result<Verdict> {
    let path = resolve_save_path(value, cwd);
    match fs::metadata(&path) {
        Ok(meta) if !meta.is_dir() => Ok(Verdict::reject("Path exists but is not a directory")),
        Ok(_) => Ok(Verdict::Accept),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Verdict::Accept),
        Err(e) => Err(e).with_context(|| format!("Failed to inspect {}", path.display())),
    }
}

pub fn save_path_prompt(prior: Option<&Path>, cwd: &Path) -> TextInput {
    let default = prior.unwrap_or(cwd).display().to_string();
    let base = cwd.to_path_buf();
    TextInput::new("Select a directory to save the devcontainer files")
        .with_default(default)
        .with_validator(move |value| validate_save_path(value, &base))
        .allow_back(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::prompt::RawKey;

    #[test]
    fn test_default_name_fallbacks() {
        let cwd = Path::new("/home/me/vault");
        assert_eq!(default_name(None, cwd), "vault");
        assert_eq!(default_name(Some("prior"), cwd), "prior");
        assert_eq!(default_name(None, Path::new("/")), DEFAULT_NAME);
        assert_eq!(default_name(Some(" . "), cwd), DEFAULT_NAME);
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(validate_name("  ok "), Verdict::Accept);
        assert!(matches!(validate_name("   "), Verdict::Reject(_)));
        assert!(matches!(validate_name(&"x".repeat(81)), Verdict::Reject(_)));
        assert_eq!(validate_name(&"x".repeat(80)), Verdict::Accept);
    }

    #[test]
    fn test_repository_url_validation() {
        assert_eq!(validate_repository_url("https://github.com/a/b"), Verdict::Accept);
        assert_eq!(validate_repository_url("git@github.com:a/b.git"), Verdict::Accept);
        assert_eq!(validate_repository_url(" ssh://host/repo "), Verdict::Accept);
        assert!(matches!(validate_repository_url("ftp://x"), Verdict::Reject(_)));
        assert!(matches!(validate_repository_url(""), Verdict::Reject(_)));
    }

    #[test]
    fn test_save_path_resolution() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_save_path("", cwd), PathBuf::from("/work"));
        assert_eq!(resolve_save_path(".", cwd), PathBuf::from("/work"));
        assert_eq!(resolve_save_path("out", cwd), PathBuf::from("/work/out"));
        assert_eq!(resolve_save_path("/abs", cwd), PathBuf::from("/abs"));
    }

    #[test]
    fn test_save_path_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            validate_save_path("file.txt", dir.path()).unwrap(),
            Verdict::Reject(_)
        ));
        assert_eq!(validate_save_path("", dir.path()).unwrap(), Verdict::Accept);
        assert_eq!(validate_save_path("new-dir", dir.path()).unwrap(), Verdict::Accept);
    }

    #[test]
    fn test_tools_prompt_preselects_prior() {
        let prompt = tools_prompt(ToolCategory::Framework, &["hardhat".to_string()]);
        assert_eq!(prompt.selected_values(), vec!["hardhat".to_string()]);
    }

    #[test]
    fn test_tools_prompt_keeps_saved_only_keys() {
        let prior = vec!["slither".to_string(), "slither-lsp".to_string()];
        let prompt = tools_prompt(ToolCategory::SecurityTooling, &prior);
        assert_eq!(prompt.selected_values(), prior);

        let mut console = ScriptedConsole::new([RawKey::enter()]);
        let answer = ask(&mut console, prompt).unwrap();
        assert_eq!(answer, PromptResult::Value(prior));
    }

    #[test]
    fn test_extensions_replay_keeps_saved_ids() {
        let prior = vec![
            "juanblanco.solidity".to_string(),
            "trailofbits.weaudit".to_string(),
        ];
        let mut console = ScriptedConsole::new([RawKey::enter(), RawKey::enter()]);
        let answer = run_extensions(&mut console, Some(prior.as_slice())).unwrap();
        assert_eq!(answer, PromptResult::Value(Answer::VscodeExtensions(prior)));
    }

    #[test]
    fn test_extensions_auto_install() {
        let mut console = ScriptedConsole::new([RawKey::enter()]);
        let answer = run_extensions(&mut console, None).unwrap();
        assert_eq!(
            answer,
            PromptResult::Value(Answer::VscodeExtensions(recommended_extensions()))
        );
    }

    #[test]
    fn test_extensions_manual_pick() {
        let mut console = ScriptedConsole::new([
            RawKey::char('n'),
            RawKey::enter(),
            RawKey::down(),
            RawKey::space(),
            RawKey::enter(),
        ]);
        let answer = run_extensions(&mut console, None).unwrap();
        assert_eq!(
            answer,
            PromptResult::Value(Answer::VscodeExtensions(vec![
                RECOMMENDED_EXTENSIONS[1].to_string()
            ]))
        );
    }

    #[test]
    fn test_git_clone_declined() {
        let mut console = ScriptedConsole::new([RawKey::enter()]);
        let answer = run_git_clone(&mut console, None).unwrap();
        assert_eq!(
            answer,
            PromptResult::Value(Answer::GitRepository(GitRepository::disabled()))
        );
    }

    #[test]
    fn test_git_clone_with_default_branch() {
        let mut console = ScriptedConsole::new([RawKey::char('y'), RawKey::enter()]);
        console
            .push_text("https://github.com/theredguild/demo")
            .push_keys([
                RawKey::enter(),
                RawKey::char('y'),
                RawKey::enter(),
                RawKey::enter(),
            ]);
        let answer = run_git_clone(&mut console, None).unwrap();
        assert_eq!(
            answer,
            PromptResult::Value(Answer::GitRepository(GitRepository {
                url: "https://github.com/theredguild/demo".to_string(),
                branch: Some(DEFAULT_BRANCH.to_string()),
                enabled: true,
            }))
        );
    }

    #[test]
    fn test_git_clone_back_from_url_leaves_step() {
        let mut console =
            ScriptedConsole::new([RawKey::char('y'), RawKey::enter(), RawKey::escape()]);
        assert!(run_git_clone(&mut console, None).unwrap().is_back());
    }
}
