//! Devcontainer Wizard Library
//!
//! An interactive terminal wizard that turns a handful of answers into a
//! hardened Web3 devcontainer (`Dockerfile` + `devcontainer.json`).
//!
//! - `prompt` + `console` - the prompt engine and its terminal boundary
//! - `wizard` - the step sequence and the answers it accumulates
//! - `logic` - the pure compiler from answers to artifacts
//! - `artifacts`, `launcher`, `prebuilt` - file, process and cache collaborators

pub mod app;
pub mod artifacts;
pub mod cli;
pub mod config_file;
pub mod console;
pub mod error;
pub mod launcher;
pub mod logic;
pub mod prebuilt;
pub mod profiles;
pub mod prompt;
pub mod theme;
pub mod types;
pub mod wizard;

// Re-export main types for convenience
pub use console::{Console, ScriptedConsole, TuiConsole};
pub use error::{Result, WizardError};
pub use logic::{compile, BuildPlan, Manifest};
pub use prompt::{PromptResult, RawKey};
pub use types::{HardeningOption, Language, ToolCategory, ToolKey};
pub use wizard::{Answer, GitRepository, Wizard, WizardState, WizardStep};
