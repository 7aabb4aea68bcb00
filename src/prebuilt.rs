//! Pre-built containers.
//!
//! The catalog names folders under `.devcontainer/` in the prebuilt
//! repository. The repository is cloned once into the user's cache and
//! pulled on later runs; the chosen folder is copied into the working
//! directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::prompt::{Choice, Select};

pub const PREBUILT_REPOSITORY: &str = "https://github.com/theredguild/devcontainer.git";

const CACHE_DIR: &str = ".devcontainer-wizard";
const CACHE_SUBDIR: &str = "prebuilt-cache";
const CHECKOUT_NAME: &str = "devcontainer";

/// One entry of the prebuilt catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prebuilt {
    /// Folder name under `.devcontainer/`.
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub experimental: bool,
}

pub static CATALOG: [Prebuilt; 6] = [
    Prebuilt {
        id: "minimal",
        label: "Minimal 🧶",
        description: "Essential development with basic security.",
        experimental: false,
    },
    Prebuilt {
        id: "auditor",
        label: "Auditor 🔍",
        description: "Smart contract auditors and security researchers.",
        experimental: false,
    },
    Prebuilt {
        id: "isolated",
        label: "Isolated 🔒",
        description: "Enhanced security with development flexibility.",
        experimental: false,
    },
    Prebuilt {
        id: "airgapped",
        label: "Air-gapped ✈️",
        description: "Air-gapped environment.",
        experimental: false,
    },
    Prebuilt {
        id: "legacy",
        label: "Legacy 🪷",
        description: "The Red Guild's original devcontainer. (Legacy)",
        experimental: false,
    },
    Prebuilt {
        id: "paranoid",
        label: "Paranoid 🔒",
        description: "Maximum security isolation, read-only OS and air-gapped environments.",
        experimental: true,
    },
];

pub fn find(id: &str) -> Option<&'static Prebuilt> {
    CATALOG.iter().find(|p| p.id == id)
}

/// `id<TAB>label` per entry, for `prebuilt --list`.
pub fn list_lines() -> Vec<String> {
    CATALOG
        .iter()
        .map(|p| format!("{}\t{}", p.id, p.label))
        .collect()
}

/// Catalog select; experimental entries sit behind a separator.
pub fn select_prompt() -> Select<&'static str> {
    let entry = |p: &Prebuilt| Choice::new(p.label, p.id).with_description(p.description);

    let mut choices: Vec<Choice<&'static str>> =
        CATALOG.iter().filter(|p| !p.experimental).map(entry).collect();
    let experimental: Vec<_> = CATALOG.iter().filter(|p| p.experimental).map(entry).collect();
    if !experimental.is_empty() {
        choices.push(Choice::separator("——— Experimental Profiles ———"));
        choices.extend(experimental);
    }

    Select::new("Select a pre-built container to start:", choices).allow_back(true)
}

// ============================================================================
// Cache
// ============================================================================

/// `~/.devcontainer-wizard/prebuilt-cache/devcontainer`
pub fn cache_checkout() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    Ok(home.join(CACHE_DIR).join(CACHE_SUBDIR).join(CHECKOUT_NAME))
}

fn run_git(args: &[&str]) -> Result<()> {
    debug!("Running git {}", shell_words::join(args));
    let output = Command::new("git")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .context("Failed to run git")?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

/// Clone the prebuilt repository into `checkout`, or update it if present.
pub fn ensure_repo(checkout: &Path) -> Result<()> {
    let path = checkout.display().to_string();
    if checkout.join(".git").is_dir() {
        info!("Updating prebuilt cache at {}", path);
        run_git(&["-C", &path, "pull", "--ff-only", "--quiet"])
            .context("Failed to update the prebuilt cache")
    } else {
        if let Some(parent) = checkout.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        info!("Cloning {} into {}", PREBUILT_REPOSITORY, path);
        run_git(&["clone", "--depth", "1", "--quiet", PREBUILT_REPOSITORY, &path])
            .context("Failed to clone the prebuilt repository")
    }
}

/// Recursive directory copy. Existing files are overwritten.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("Failed to create directory {:?}", dst))?;
    for entry in fs::read_dir(src).with_context(|| format!("Failed to read {:?}", src))? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&from, &to)?;
        } else {
            fs::copy(&from, &to).with_context(|| format!("Failed to copy {:?}", from))?;
        }
    }
    Ok(())
}

/// Copy `<checkout>/.devcontainer/<id>` into `<cwd>/.devcontainer/<id>`.
/// Returns the copied `devcontainer.json`.
pub fn copy_prebuilt(checkout: &Path, id: &str, cwd: &Path) -> Result<PathBuf> {
    let source = checkout.join(".devcontainer").join(id);
    if !source.is_dir() {
        anyhow::bail!("Prebuilt container {:?} not found in {:?}", id, checkout);
    }
    let target = cwd.join(".devcontainer").join(id);
    copy_dir(&source, &target)?;
    Ok(target.join("devcontainer.json"))
}
