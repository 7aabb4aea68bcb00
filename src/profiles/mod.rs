//! Security profile table.
//!
//! A profile is a named bundle of hardening options. Resolution is a pure
//! table lookup; an unregistered key is an error, never an empty set.
//!
//! # Profiles
//!
//! | Profile     | Network      | Read-only OS | Notes |
//! |-------------|--------------|--------------|-------|
//! | development | secure DNS   | no           | daily work |
//! | hardened    | secure DNS   | no           | no raw packets |
//! | isolated    | none         | yes          | air-gapped |
//!
//! The remaining profiles are experimental and shown behind a separator.

use std::collections::BTreeSet;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::warn;

use crate::error::{Result, WizardError};
use crate::types::HardeningOption;

/// Named hardening bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SecurityProfile {
    Development,
    Hardened,
    Isolated,
    NetworkRestrictedAnalysis,
    CiLikeLocalRunner,
    PackageInstallSession,
    SecurityResearchControlledNet,
}

impl SecurityProfile {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Hardened => "Hardened",
            Self::Isolated => "Isolated",
            Self::NetworkRestrictedAnalysis => "Network Restricted Analysis",
            Self::CiLikeLocalRunner => "CI-like Local Runner",
            Self::PackageInstallSession => "Package Install Session",
            Self::SecurityResearchControlledNet => "Security Research (Controlled Net)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Development => "Balanced security for daily development work",
            Self::Hardened => {
                "Enhanced security for smart contract auditing and security research"
            }
            Self::Isolated => "Maximum security with air-gapped environment",
            Self::NetworkRestrictedAnalysis => {
                "For web APIs, git, and package installs without packet crafting capabilities."
            }
            Self::CiLikeLocalRunner => "Mirrors CI behavior locally with immutable file system.",
            Self::PackageInstallSession => {
                "Allows installing packages while keeping guardrails in place."
            }
            Self::SecurityResearchControlledNet => {
                "For API testing and collectors without packet crafting capability."
            }
        }
    }

    /// What stops working under this profile.
    pub fn caveat(&self) -> &'static str {
        match self {
            Self::Development => "Standard development environment with basic security hardening.",
            Self::Hardened => {
                "Packet-crafting tools will not work due to no-raw-packets restriction."
            }
            Self::Isolated => {
                "No network access or persistent storage - extensions and package managers will not work."
            }
            Self::NetworkRestrictedAnalysis | Self::SecurityResearchControlledNet => {
                "Packet-crafting tools will not work."
            }
            Self::CiLikeLocalRunner => "Cache writes will not persist across runs.",
            Self::PackageInstallSession => "Omit drop-caps if installs fail unexpectedly.",
        }
    }

    /// Experimental profiles are listed after the stable ones.
    pub fn is_experimental(&self) -> bool {
        !matches!(self, Self::Development | Self::Hardened | Self::Isolated)
    }

    /// Hardening options this profile implies.
    pub fn options(&self) -> &'static [HardeningOption] {
        use HardeningOption::*;
        match self {
            Self::Development => &[SecureTmp, NoNewPrivs, Apparmor, SecureDns, VscodeSecurity],
            Self::Hardened => &[
                EphemeralWorkspace,
                SecureTmp,
                DropCaps,
                NoNewPrivs,
                Apparmor,
                NoRawPackets,
                SecureDns,
                VscodeSecurity,
            ],
            Self::Isolated => &[
                ReadonlyOs,
                EphemeralWorkspace,
                SecureTmp,
                DropCaps,
                NoNewPrivs,
                Apparmor,
                NetworkNone,
                VscodeSecurity,
            ],
            Self::NetworkRestrictedAnalysis | Self::SecurityResearchControlledNet => &[
                EphemeralWorkspace,
                SecureTmp,
                DropCaps,
                NoNewPrivs,
                Apparmor,
                NoRawPackets,
                SecureDns,
            ],
            Self::CiLikeLocalRunner => &[
                ReadonlyOs,
                EphemeralWorkspace,
                SecureTmp,
                DropCaps,
                NoNewPrivs,
                Apparmor,
                SecureDns,
            ],
            Self::PackageInstallSession => &[
                EphemeralWorkspace,
                SecureTmp,
                NoNewPrivs,
                Apparmor,
                SecureDns,
                VscodeSecurity,
            ],
        }
    }

    /// Implied options as a set, ordered by catalog order.
    pub fn option_set(&self) -> BTreeSet<HardeningOption> {
        self.options().iter().copied().collect()
    }
}

/// Resolve a profile key to its hardening options.
pub fn resolve_profile(key: &str) -> Result<BTreeSet<HardeningOption>> {
    match SecurityProfile::from_str(key) {
        Ok(profile) => Ok(profile.option_set()),
        Err(_) => {
            warn!("Unknown security profile requested: {}", key);
            Err(WizardError::UnknownProfile(key.to_string()))
        }
    }
}

/// Lines for the non-interactive `profiles` listing.
pub fn listing() -> Vec<String> {
    SecurityProfile::iter()
        .map(|profile| {
            let options: Vec<&'static str> =
                profile.options().iter().map(|o| o.into()).collect();
            let marker = if profile.is_experimental() {
                " (experimental)"
            } else {
                ""
            };
            format!(
                "{}\t{}{}\n\t{}\n\tCaveat: {}\n\tOptions: {}",
                profile,
                profile.label(),
                marker,
                profile.description(),
                profile.caveat(),
                options.join(", ")
            )
        })
        .collect()
}
