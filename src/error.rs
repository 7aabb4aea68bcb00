//! Error handling module for the devcontainer wizard
//!
//! Provides centralized error handling with proper error types using thiserror.
//! User cancellation travels through the same channel as real failures so every
//! suspension point unwinds the same way; `exit_code` tells them apart.

use thiserror::Error;

/// Exit status used when the user aborts the wizard with Ctrl+C.
pub const EXIT_CANCELLED: i32 = 130;

/// Exit status for every other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Printed when the user aborts.
pub const GOODBYE: &str = "Exited with CTRL+C 👋";

/// Main error type for the wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The user aborted the wizard (Ctrl+C)
    #[error("Cancelled by user")]
    Cancelled,

    /// A tool key that is not part of the tool catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A security profile key that is not part of the profile table
    #[error("Unknown security profile: {0}")]
    UnknownProfile(String),

    /// A hardening option key that is not part of the hardening catalog
    #[error("Unknown hardening option: {0}")]
    UnknownHardening(String),

    /// A wizard selection (language, extension, ...) that maps to nothing
    #[error("Unknown {category} selection: {key}")]
    UnknownSelection { category: &'static str, key: String },

    /// Validation errors (saved answers, conflicting options)
    #[error("Validation error: {0}")]
    Validation(String),

    /// External process failures (devcontainer CLI, git)
    #[error("Process failed: {0}")]
    Process(String),

    /// Configuration errors (loading, parsing)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

// Convenient error constructors
impl WizardError {
    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a process error
    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown-selection error for a wizard category
    pub fn unknown_selection(category: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownSelection {
            category,
            key: key.into(),
        }
    }

    /// Whether this error is the user's own abort rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_cancelled() {
            EXIT_CANCELLED
        } else {
            EXIT_FAILURE
        }
    }
}
