use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Devcontainer Wizard - hardened Web3 development containers
#[derive(Parser)]
#[command(name = "devcontainer-wizard")]
#[command(about = "Build a hardened Web3 devcontainer interactively, or start a pre-built one")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a custom devcontainer through the wizard
    Create {
        /// Devcontainer name (skips the name prompt)
        #[arg(short = 'N', long)]
        name: Option<String>,

        /// Saved answers to pre-populate every prompt with
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Save the final answers to this file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Print the Dockerfile and devcontainer.json instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Write the files but do not offer to start the container
        #[arg(long)]
        no_start: bool,
    },
    /// Start one of the pre-built devcontainers
    Prebuilt {
        /// Pre-built container id (skips the selection prompt)
        #[arg(short = 'N', long)]
        name: Option<String>,

        /// List the pre-built containers and exit
        #[arg(short = 'L', long)]
        list: bool,
    },
    /// List security profiles and the hardening options they apply
    Profiles,
    /// Validate a saved answers file
    Validate {
        /// Path to the answers file
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
