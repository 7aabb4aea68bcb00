//! Dockerfile instruction sequence.
//!
//! Builds the ordered list of instruction blocks; joining them with newlines
//! gives the Dockerfile. Tool blocks come from `ToolKey::install_template`,
//! echidna additionally gets a build stage and a binary copy.

use crate::types::ToolKey;
use crate::wizard::GitRepository;

const BASE_PACKAGES: [&str; 11] = [
    "bash-completion",
    "build-essential",
    "curl",
    "git",
    "jq",
    "pkg-config",
    "sudo",
    "unzip",
    "vim",
    "wget",
    "zsh",
];

const PYTHON_PACKAGES: [&str; 4] = ["python3-pip", "libpython3-dev", "python3-dev", "python3-venv"];

fn apt_install(packages: &[&str]) -> String {
    let mut block = String::from(
        "RUN apt-get update && DEBIAN_FRONTEND=noninteractive apt-get install -y --no-install-recommends \\\n",
    );
    for package in packages {
        block.push_str("    ");
        block.push_str(package);
        block.push_str(" \\\n");
    }
    block.push_str("    && rm -rf /var/lib/apt/lists/*");
    block
}

fn lines(block: &[&str]) -> String {
    block.join("\n")
}

/// Clone directive for the repository. URL and branch are shell-quoted.
pub fn git_clone_block(repo: &GitRepository) -> String {
    let branch = repo
        .branch
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| format!("--branch {} ", shell_words::quote(b)))
        .unwrap_or_default();

    format!(
        concat!(
            "# Clone git repo\n",
            "RUN mkdir -p /home/vscode/repos \\\n",
            "    && git clone {}{} /home/vscode/repos/project \\\n",
            "    && chown -R vscode:vscode /home/vscode/repos",
        ),
        branch,
        shell_words::quote(repo.url.trim())
    )
}

/// Instruction blocks for the given install order.
///
/// `tools` must already be in install order (core runtimes first).
pub fn instructions(tools: &[ToolKey], repo: Option<&GitRepository>) -> Vec<String> {
    let needs = |t: ToolKey| tools.contains(&t);
    let mut out: Vec<String> = Vec::new();

    out.push(lines(&["# syntax=docker/dockerfile:1.8", "# check=error=true"]));

    if needs(ToolKey::Echidna) {
        out.push(lines(&[
            "# Multi-stage build for Echidna",
            "FROM --platform=linux/amd64 ghcr.io/crytic/echidna/echidna:latest AS echidna",
            "",
        ]));
    }

    out.push(lines(&[
        "# Base image: Debian 12",
        "FROM mcr.microsoft.com/vscode/devcontainers/base:bookworm",
        "",
    ]));
    out.push(apt_install(&BASE_PACKAGES));

    if needs(ToolKey::Python) {
        out.push(format!(
            "# Install Python dependencies\n{}",
            apt_install(&PYTHON_PACKAGES)
        ));
    }

    out.push(lines(&[
        "# Switch to vscode (drop privs)",
        "USER vscode",
        "WORKDIR /home/vscode",
        "ENV HOME=/home/vscode",
        "# Update PATH",
        "ENV USR_LOCAL_BIN=/usr/local/bin",
        "ENV LOCAL_BIN=${HOME}/.local/bin",
        "ENV PNPM_HOME=${HOME}/.local/share/pnpm",
        "ENV PATH=${PATH}:${USR_LOCAL_BIN}:${LOCAL_BIN}:${PNPM_HOME}",
    ]));

    if needs(ToolKey::Python) {
        out.push(lines(&[
            "# Install uv",
            "RUN curl -LsSf https://astral.sh/uv/install.sh | sh",
            "# Update PATH environment",
            "ENV UV_LOCAL_BIN=$HOME/.cargo/bin",
            "ENV PATH=${PATH}:${USR_LOCAL_BIN}:${LOCAL_BIN}:${PNPM_HOME}:${UV_LOCAL_BIN}",
            "# Install Python 3.12 with uv",
            "RUN uv python install 3.12",
        ]));
    }

    out.push(lines(&[
        "# Set the default shell execution for subsequent RUN commands",
        "ENV SHELL=/usr/bin/zsh",
        "SHELL [\"/bin/zsh\", \"-ic\"]",
    ]));

    for tool in tools {
        match tool {
            ToolKey::Python => {}
            t if t.is_core_runtime() => out.push(format!("{}\n", t.install_template())),
            t => out.push(format!("# Install {}\n{}\n", t, t.install_template())),
        }
    }

    if needs(ToolKey::Echidna) {
        out.push(lines(&[
            "USER root",
            "# Copy Echidna binary from echidna stage",
            "COPY --from=echidna /usr/local/bin/echidna /usr/local/bin/echidna",
            "RUN chmod 755 /usr/local/bin/echidna",
            "USER vscode",
        ]));
    }

    out.push(lines(&[
        "# Final setup",
        "RUN echo 'Development environment ready!' && \\",
        "    echo 'Tools installed:' && \\",
        "    ls -la $HOME/.local/bin/ || true",
        "",
        "WORKDIR /workspace",
    ]));

    if let Some(repo) = repo.filter(|r| r.is_active()) {
        out.push(git_clone_block(repo));
    }

    out
}

/// Dockerfile text for an instruction sequence.
pub fn render(instructions: &[String]) -> String {
    let mut text = instructions.join("\n");
    text.push('\n');
    text
}
