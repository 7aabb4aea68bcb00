//! Catalog types for the wizard.
//!
//! Every selectable key the wizard offers lives here as a strum enum, so the
//! prompts, the compiler and the saved-answers validator agree on one closed
//! catalog. Keys serialize in kebab-case, matching what users see in
//! `devcontainer.json` and in saved answer files.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Wizard category a selection belongs to. Used when reporting keys that map
/// to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolCategory {
    Framework,
    FuzzingAndTesting,
    SecurityTooling,
}

impl ToolCategory {
    /// Human-readable category name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Framework => "framework",
            Self::FuzzingAndTesting => "fuzzing & testing",
            Self::SecurityTooling => "security tooling",
        }
    }
}

// ============================================================================
// Tools
// ============================================================================

/// Installable runtime or tool.
///
/// Each key owns one install template and a static list of keys it implies.
/// The implication table has no cycles: runtimes imply nothing and every tool
/// implies only runtimes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ToolKey {
    // Runtimes
    Python,
    Rust,
    Go,
    Node,

    // Frameworks
    Foundry,
    Hardhat,
    Ape,

    // Fuzzing & testing
    Echidna,
    Medusa,
    Halmos,
    Ityfuzz,
    Aderyn,

    // Security tooling
    Slither,
    Mythril,
    CryticCompile,
    Panoramix,
    Semgrep,
    Heimdall,
    SlitherLsp,
    NapalmToolbox,
    Slitherin,

    // Compilers pulled in by languages
    Vyper,
    SolcSelect,
}

/// Runtimes installed ahead of every other tool, in this order.
pub const CORE_RUNTIME_ORDER: [ToolKey; 3] = [ToolKey::Rust, ToolKey::Go, ToolKey::Node];

/// Extension required by the Panoramix decompiler.
pub const DECOMPILER_EXTENSION: &str = "tintinweb.vscode-decompiler";

impl ToolKey {
    /// Keys this tool needs installed before it.
    pub fn implies(&self) -> &'static [ToolKey] {
        match self {
            Self::Python | Self::Rust | Self::Go | Self::Node => &[],
            Self::Foundry | Self::Ityfuzz | Self::Aderyn | Self::Heimdall => &[Self::Rust],
            Self::Hardhat => &[Self::Node],
            Self::Echidna | Self::Medusa => &[Self::Go],
            Self::Ape
            | Self::Halmos
            | Self::Slither
            | Self::Mythril
            | Self::CryticCompile
            | Self::Panoramix
            | Self::Semgrep
            | Self::SlitherLsp
            | Self::NapalmToolbox
            | Self::Slitherin
            | Self::Vyper
            | Self::SolcSelect => &[Self::Python],
        }
    }

    /// Whether this key belongs to the fixed runtime prefix.
    pub fn is_core_runtime(&self) -> bool {
        CORE_RUNTIME_ORDER.contains(self)
    }

    /// Wizard category this key can be picked from, if any.
    pub fn category(&self) -> Option<ToolCategory> {
        match self {
            Self::Foundry | Self::Hardhat | Self::Ape => Some(ToolCategory::Framework),
            Self::Echidna | Self::Medusa | Self::Halmos | Self::Ityfuzz | Self::Aderyn => {
                Some(ToolCategory::FuzzingAndTesting)
            }
            Self::Slither
            | Self::Mythril
            | Self::CryticCompile
            | Self::Panoramix
            | Self::Semgrep
            | Self::Heimdall
            | Self::SlitherLsp
            | Self::NapalmToolbox
            | Self::Slitherin => Some(ToolCategory::SecurityTooling),
            Self::Python | Self::Rust | Self::Go | Self::Node | Self::Vyper | Self::SolcSelect => {
                None
            }
        }
    }

    /// Whether the interactive wizard lists this key. The remaining catalog
    /// keys are still accepted from saved answer files.
    pub fn offered(&self) -> bool {
        !matches!(
            self,
            Self::SlitherLsp | Self::NapalmToolbox | Self::Slitherin
        )
    }

    /// Keys offered by the wizard for one category, in catalog order.
    pub fn offered_in(category: ToolCategory) -> Vec<ToolKey> {
        Self::iter()
            .filter(|tool| tool.category() == Some(category) && tool.offered())
            .collect()
    }

    /// VS Code extensions this tool needs.
    pub fn implied_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Panoramix => &[DECOMPILER_EXTENSION],
            _ => &[],
        }
    }

    /// Display label used in the wizard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::Node => "Node.js",
            Self::Foundry => "Foundry",
            Self::Hardhat => "Hardhat",
            Self::Ape => "Ape (ApeWorX)",
            Self::Echidna => "Echidna",
            Self::Medusa => "Medusa",
            Self::Halmos => "Halmos",
            Self::Ityfuzz => "Ityfuzz",
            Self::Aderyn => "Aderyn",
            Self::Slither => "Slither",
            Self::Mythril => "Mythril",
            Self::CryticCompile => "Crytic",
            Self::Panoramix => "Panoramix",
            Self::Semgrep => "Semgrep",
            Self::Heimdall => "Heimdall",
            Self::SlitherLsp => "Slither LSP",
            Self::NapalmToolbox => "Napalm Toolbox",
            Self::Slitherin => "Slitherin",
            Self::Vyper => "Vyper",
            Self::SolcSelect => "solc-select",
        }
    }

    /// One-line description shown above the list while the tool is highlighted.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Foundry | Self::Ityfuzz | Self::Aderyn | Self::Heimdall => {
                "Automatically installs: Rust"
            }
            Self::Hardhat => "Automatically installs: Node.js, pnpm (package manager)",
            Self::Echidna | Self::Medusa => "Automatically installs: Golang, asdf (package manager)",
            Self::Panoramix => {
                "Automatically installs: Python, uv (package manager), Panoramix VS Code extension"
            }
            Self::Ape
            | Self::Halmos
            | Self::Slither
            | Self::Mythril
            | Self::CryticCompile
            | Self::Semgrep
            | Self::SlitherLsp
            | Self::NapalmToolbox
            | Self::Slitherin
            | Self::Vyper
            | Self::SolcSelect => "Automatically installs: Python, uv (package manager)",
            Self::Python => "Python runtime with pip and uv package managers",
            Self::Rust => "Rust compiler and cargo package manager",
            Self::Go => "Go programming language with asdf version manager",
            Self::Node => "Node.js runtime with pnpm package manager",
        }
    }

    /// Dockerfile block installing this tool. Python is provisioned by the
    /// base layer and has an empty template.
    pub fn install_template(&self) -> &'static str {
        match self {
            Self::Python => "",
            Self::Rust => concat!(
                "# Install rust\n",
                "RUN curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y\n",
                "ENV PATH=\"$HOME/.cargo/bin:$PATH\"",
            ),
            Self::Go => concat!(
                "# Install golang's latest version through asdf\n",
                "RUN git clone https://github.com/asdf-vm/asdf.git $HOME/.asdf --branch v0.15.0 && \\\n",
                "    echo '. $HOME/.asdf/asdf.sh' >> $HOME/.zshrc && \\\n",
                "    echo 'fpath=(${ASDF_DIR}/completions $fpath)' >> $HOME/.zshrc && \\\n",
                "    echo 'autoload -Uz compinit && compinit' >> $HOME/.zshrc && \\\n",
                "    . $HOME/.asdf/asdf.sh && \\\n",
                "    asdf plugin add golang && \\\n",
                "    asdf install golang latest && \\\n",
                "    asdf global golang latest",
            ),
            Self::Node => concat!(
                "USER root\n",
                "# Install nvm, yarn, npm, pnpm\n",
                "RUN curl -o- https://raw.githubusercontent.com/devcontainers/features/main/src/node/install.sh | bash\n",
                "RUN chown -R vscode:vscode ${HOME}/.npm\n",
                "USER vscode\n",
                "ENV PNPM_HOME=${HOME}/.local/share/pnpm\n",
                "ENV PATH=${PATH}:${PNPM_HOME}",
            ),
            Self::Foundry => concat!(
                "RUN curl -fsSL https://foundry.paradigm.xyz | zsh && \\\n",
                "    echo 'export PATH=\"$HOME/.foundry/bin:$PATH\"' >> ~/.zshrc && \\\n",
                "    export PATH=\"$HOME/.foundry/bin:$PATH\" && \\\n",
                "    ~/.foundry/bin/foundryup",
            ),
            Self::Hardhat => "RUN pnpm install hardhat -g",
            Self::Ape => "RUN uv tool install eth-ape",
            Self::Echidna => concat!(
                "# Echidna is copied from the echidna build stage\n",
                "RUN echo 'Echidna installed via multi-stage build'",
            ),
            Self::Ityfuzz => concat!(
                "RUN curl -fsSL https://ity.fuzz.land/ | zsh && \\\n",
                "    echo 'export PATH=\"$HOME/.ityfuzz/bin:$PATH\"' >> ~/.zshrc && \\\n",
                "    export PATH=\"$HOME/.ityfuzz/bin:$PATH\" && \\\n",
                "    ~/.ityfuzz/bin/ityfuzzup",
            ),
            Self::Medusa => concat!(
                "WORKDIR $HOME/medusa\n",
                "RUN git clone https://github.com/crytic/medusa $HOME/medusa && \\\n",
                "    export LATEST_TAG=\"$(git describe --tags | sed 's/-[0-9]\\+-g\\w\\+$//')\" && \\\n",
                "    git checkout \"$LATEST_TAG\" && \\\n",
                "    go build -trimpath -o=$HOME/.local/bin/medusa -ldflags=\"-s -w\" && \\\n",
                "    chmod 755 $HOME/.local/bin/medusa\n",
                "WORKDIR $HOME\n",
                "RUN rm -rf medusa/",
            ),
            Self::Halmos => "RUN uv tool install halmos",
            Self::Slither => "RUN uv tool install slither-analyzer",
            Self::Mythril => "RUN uv tool install mythril",
            Self::CryticCompile => "RUN uv tool install crytic-compile",
            Self::Panoramix => "RUN uv tool install panoramix-decompiler",
            Self::SlitherLsp => "RUN uv tool install slither-lsp",
            Self::NapalmToolbox => "RUN uv tool install napalm-toolbox",
            Self::Semgrep => "RUN uv tool install semgrep",
            Self::Slitherin => "RUN uv tool install slitherin",
            Self::Heimdall => concat!(
                "RUN /bin/zsh -c \"curl -fsSL https://get.heimdall.rs | zsh\" && \\\n",
                "    echo 'export PATH=\"$HOME/.bifrost/bin:$PATH\"' >> ~/.zshrc && \\\n",
                "    /bin/zsh -c \"source ~/.cargo/env && source ~/.zshrc && bifrost --version || echo 'Heimdall installed'\"\n",
                "ENV PATH=\"/home/vscode/.bifrost/bin:/home/vscode/.cargo/bin:$PATH\"",
            ),
            Self::Vyper => "RUN uv tool install vyper",
            Self::SolcSelect => concat!(
                "RUN uv tool install solc-select && \\\n",
                "    solc-select install 0.4.26 0.5.17 0.6.12 0.7.6 0.8.10 latest && \\\n",
                "    solc-select use latest",
            ),
            Self::Aderyn => concat!(
                "RUN /bin/zsh -c \"curl -fsSL https://raw.githubusercontent.com/Cyfrin/up/main/install | zsh\" && \\\n",
                "    echo 'export PATH=\"$HOME/.cyfrin/bin:$PATH\"' >> ~/.zshrc\n",
                "ENV PATH=\"/home/vscode/.cyfrin/bin:$PATH\"\n",
                "RUN /bin/zsh -c \"source ~/.zshrc && (~/.cyfrin/bin/cyfrinup || cyfrinup)\"",
            ),
        }
    }
}

// ============================================================================
// Languages
// ============================================================================

/// Smart contract language. Languages are not tools themselves; each one
/// pulls in a fixed set of tool keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Solidity,
    Vyper,
}

impl Language {
    /// Tool keys installed for this language, dependencies first.
    pub fn tools(&self) -> &'static [ToolKey] {
        match self {
            Self::Solidity => &[ToolKey::Python, ToolKey::SolcSelect],
            Self::Vyper => &[ToolKey::Python, ToolKey::Vyper],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Solidity => "Solidity",
            Self::Vyper => "Vyper",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Solidity => "Automatically installs: solc, solc-select",
            Self::Vyper => "Automatically installs: python, python3-dev, libpython3-dev, uv",
        }
    }
}

// ============================================================================
// Hardening
// ============================================================================

/// Group a hardening option is offered under in the manual hardening flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardeningGroup {
    FileSystem,
    Container,
    Network,
    Application,
    Resources,
}

/// Runtime security directive.
///
/// Variant order is the catalog order. When conflicting options reach the
/// compiler, the one earlier in this order wins.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum HardeningOption {
    ReadonlyOs,
    SecureTmp,
    EphemeralWorkspace,
    DropCaps,
    NoNewPrivs,
    Apparmor,
    Seccomp,
    NetworkNone,
    SecureDns,
    DisableIpv6,
    NoRawPackets,
    VscodeSecurity,
    ResourceLimits,
    ResourceLimitsMedium,
    ResourceLimitsHeavy,
}

impl HardeningOption {
    /// Whether the two options may not be applied together.
    pub fn conflicts_with(&self, other: &HardeningOption) -> bool {
        use HardeningOption::*;
        if self == other {
            return false;
        }
        matches!(
            (self, other),
            (NetworkNone, SecureDns)
                | (SecureDns, NetworkNone)
                | (NetworkNone, DisableIpv6)
                | (DisableIpv6, NetworkNone)
        ) || (self.is_resource_tier() && other.is_resource_tier())
    }

    /// Whether this is one of the mutually exclusive resource tiers.
    pub fn is_resource_tier(&self) -> bool {
        matches!(
            self,
            Self::ResourceLimits | Self::ResourceLimitsMedium | Self::ResourceLimitsHeavy
        )
    }

    pub fn group(&self) -> HardeningGroup {
        match self {
            Self::ReadonlyOs | Self::SecureTmp | Self::EphemeralWorkspace => {
                HardeningGroup::FileSystem
            }
            Self::DropCaps | Self::NoNewPrivs | Self::Apparmor | Self::Seccomp => {
                HardeningGroup::Container
            }
            Self::NetworkNone | Self::SecureDns | Self::DisableIpv6 | Self::NoRawPackets => {
                HardeningGroup::Network
            }
            Self::VscodeSecurity => HardeningGroup::Application,
            Self::ResourceLimits | Self::ResourceLimitsMedium | Self::ResourceLimitsHeavy => {
                HardeningGroup::Resources
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ReadonlyOs => "Read-only file system",
            Self::SecureTmp => "Secure temp directories",
            Self::EphemeralWorkspace => "Ephemeral workspace",
            Self::DropCaps => "Drop all capabilities",
            Self::NoNewPrivs => "No new privileges",
            Self::Apparmor => "AppArmor profile",
            Self::Seccomp => "Seccomp filtering",
            Self::NetworkNone => "Complete network isolation",
            Self::SecureDns => "Enhanced DNS security",
            Self::DisableIpv6 => "Disable IPv6",
            Self::NoRawPackets => "Disable raw packets",
            Self::VscodeSecurity => "VS Code security",
            Self::ResourceLimits => "Light (512MB, 2 cores)",
            Self::ResourceLimitsMedium => "Medium (2GB, 4 cores)",
            Self::ResourceLimitsHeavy => "Heavy (4GB, 8 cores)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ReadonlyOs => "Mounts the file system as read-only",
            Self::SecureTmp => "Creates temp dirs with noexec, nosuid flags",
            Self::EphemeralWorkspace => "Uses a tmpfs mount to create an ephemeral workspace",
            Self::DropCaps => "Removes all Linux capabilities from container",
            Self::NoNewPrivs => "Prevents privilege escalation through SUID/SGID",
            Self::Apparmor => "Applies Docker's default AppArmor MAC profile",
            Self::Seccomp => "Applies default seccomp security profile",
            Self::NetworkNone => {
                "Completely isolates container from network (conflicts with DNS options)"
            }
            Self::SecureDns => "Forces Cloudflare DNS (1.1.1.1, 1.0.0.1)",
            Self::DisableIpv6 => "Disables IPv6 networking to reduce attack surface",
            Self::NoRawPackets => "Drops NET_RAW capability to prevent packet crafting",
            Self::VscodeSecurity => "Disables auto-tasks, workspace trust, and telemetry",
            Self::ResourceLimits => "Suitable for simple development",
            Self::ResourceLimitsMedium => "Better for Node.js, Rust, Java projects",
            Self::ResourceLimitsHeavy => "For ML, large builds, or complex projects",
        }
    }

    /// Options offered under one manual-flow group, in catalog order.
    pub fn in_group(group: HardeningGroup) -> Vec<HardeningOption> {
        Self::iter().filter(|o| o.group() == group).collect()
    }
}

// ============================================================================
// Editor extensions
// ============================================================================

/// Recommended VS Code extensions.
pub const RECOMMENDED_EXTENSIONS: [&str; 10] = [
    "tintinweb.ethereum-security-bundle",
    "tintinweb.vscode-ethover",
    "trailofbits.weaudit",
    "tintinweb.vscode-inline-bookmarks",
    "tintinweb.vscode-solidity-language",
    "tintinweb.graphviz-interactive-preview",
    "NomicFoundation.hardhat-solidity",
    "Olympixai.olympix",
    "trailofbits.contract-explorer",
    DECOMPILER_EXTENSION,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tool_keys_parse_kebab_case() {
        assert_eq!(ToolKey::from_str("solc-select").unwrap(), ToolKey::SolcSelect);
        assert_eq!(ToolKey::from_str("crytic-compile").unwrap(), ToolKey::CryticCompile);
        assert_eq!(ToolKey::NapalmToolbox.to_string(), "napalm-toolbox");
        assert!(ToolKey::from_str("hammer").is_err());
    }

    #[test]
    fn test_implications_only_point_at_runtimes() {
        for tool in ToolKey::iter() {
            for dep in tool.implies() {
                assert!(
                    dep.implies().is_empty(),
                    "{} implies {} which has its own dependencies",
                    tool,
                    dep
                );
            }
        }
    }

    #[test]
    fn test_templates_exist_for_every_tool_but_python() {
        for tool in ToolKey::iter() {
            if tool == ToolKey::Python {
                assert!(tool.install_template().is_empty());
            } else {
                assert!(!tool.install_template().is_empty(), "{} has no template", tool);
            }
        }
    }

    #[test]
    fn test_offered_categories() {
        assert_eq!(
            ToolKey::offered_in(ToolCategory::Framework),
            vec![ToolKey::Foundry, ToolKey::Hardhat, ToolKey::Ape]
        );
        let security = ToolKey::offered_in(ToolCategory::SecurityTooling);
        assert_eq!(security.len(), 6);
        assert!(!security.contains(&ToolKey::Slitherin));
    }

    #[test]
    fn test_hardening_conflicts_are_symmetric() {
        for a in HardeningOption::iter() {
            assert!(!a.conflicts_with(&a));
            for b in HardeningOption::iter() {
                assert_eq!(a.conflicts_with(&b), b.conflicts_with(&a));
            }
        }
        assert!(HardeningOption::NetworkNone.conflicts_with(&HardeningOption::SecureDns));
        assert!(HardeningOption::ResourceLimits.conflicts_with(&HardeningOption::ResourceLimitsHeavy));
        assert!(!HardeningOption::SecureDns.conflicts_with(&HardeningOption::DisableIpv6));
    }

    #[test]
    fn test_hardening_catalog_order() {
        let order: Vec<HardeningOption> = HardeningOption::iter().collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert!(HardeningOption::NetworkNone < HardeningOption::SecureDns);
    }

    #[test]
    fn test_language_tools() {
        assert_eq!(Language::from_str("solidity").unwrap(), Language::Solidity);
        assert_eq!(
            Language::Vyper.tools(),
            &[ToolKey::Python, ToolKey::Vyper]
        );
    }

    #[test]
    fn test_recommended_extensions_include_decompiler() {
        assert!(RECOMMENDED_EXTENSIONS.contains(&DECOMPILER_EXTENSION));
    }
}
