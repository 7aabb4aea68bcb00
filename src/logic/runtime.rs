//! Hardening to runtime directives.
//!
//! Each hardening option maps to zero or more `docker run` flags, or to a
//! manifest-only effect. Conflicting options are expected to be filtered at
//! selection time; if they still arrive here the one earlier in catalog order
//! wins and the rest are logged and dropped.

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::warn;

use crate::error::{Result, WizardError};
use crate::types::HardeningOption;

/// Workspace bind mount of the local folder.
pub const BIND_WORKSPACE_MOUNT: &str =
    "source=${localWorkspaceFolder},target=/workspace,type=bind,consistency=cached";

/// Workspace mount used with `ephemeral-workspace`.
pub const TMPFS_WORKSPACE_MOUNT: &str = "type=tmpfs,destination=/workspace,tmpfs-mode=1777";

const READONLY_TMPFS: [&str; 11] = [
    "/home/vscode/.vscode-server:rw,exec,nosuid,size=512m,uid=1000,gid=1000",
    "/home/vscode/.vscode-server-insiders:rw,exec,nosuid,size=256m,uid=1000,gid=1000",
    "/home/vscode/.cache:rw,noexec,nosuid,size=256m,uid=1000,gid=1000",
    "/home/vscode/.config:rw,noexec,nosuid,size=128m,uid=1000,gid=1000",
    "/home/vscode/.local:rw,noexec,nosuid,size=256m,uid=1000,gid=1000",
    "/home/vscode/.gnupg:rw,noexec,nosuid,size=32m,uid=1000,gid=1000",
    "/tmp:rw,noexec,nosuid,size=512m",
    "/var/tmp:rw,noexec,nosuid,size=512m",
    "/var/log:rw,noexec,nosuid,size=128m",
    "/run:rw,noexec,nosuid,size=128m",
    "/home/vscode/.devcontainer:rw,noexec,nosuid,size=32m,uid=1000,gid=1000",
];

const SECURE_TMPFS: [&str; 2] = [
    "/tmp:rw,noexec,nosuid,size=512m",
    "/var/tmp:rw,noexec,nosuid,size=512m",
];

/// Everything the hardening set contributes to the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDirectives {
    /// Options actually applied, in catalog order.
    pub effective: Vec<HardeningOption>,
    pub run_args: Vec<String>,
    pub workspace_mount: &'static str,
    /// Whether the locked-down VS Code settings apply.
    pub vscode_security: bool,
}

impl RuntimeDirectives {
    pub fn has(&self, option: HardeningOption) -> bool {
        self.effective.contains(&option)
    }

    pub fn is_ephemeral(&self) -> bool {
        self.has(HardeningOption::EphemeralWorkspace)
    }
}

/// Parse option keys. Unknown keys are errors.
pub fn parse_hardening(keys: &[String]) -> Result<Vec<HardeningOption>> {
    keys.iter()
        .map(|key| {
            HardeningOption::from_str(key).map_err(|_| {
                warn!("Unknown hardening option: {}", key);
                WizardError::UnknownHardening(key.clone())
            })
        })
        .collect()
}

/// Drop conflicting options, first in catalog order wins.
pub fn resolve_conflicts(options: &[HardeningOption]) -> Vec<HardeningOption> {
    let sorted: BTreeSet<HardeningOption> = options.iter().copied().collect();
    let mut kept: Vec<HardeningOption> = Vec::with_capacity(sorted.len());

    for option in sorted {
        if let Some(winner) = kept.iter().find(|k| k.conflicts_with(&option)) {
            warn!(
                "Conflicting hardening options {} and {}; dropping {}",
                winner, option, option
            );
            continue;
        }
        kept.push(option);
    }
    kept
}

fn tmpfs(args: &mut Vec<String>, mounts: &[&str]) {
    for mount in mounts {
        args.push("--tmpfs".to_string());
        args.push(mount.to_string());
    }
}

fn push(args: &mut Vec<String>, flags: &[&str]) {
    args.extend(flags.iter().map(|f| f.to_string()));
}

/// Translate a conflict-free option list into runtime directives.
pub fn directives(options: &[HardeningOption]) -> RuntimeDirectives {
    use HardeningOption::*;

    let effective = resolve_conflicts(options);
    let has = |o: HardeningOption| effective.contains(&o);
    let mut args: Vec<String> = Vec::new();

    // Capabilities. Dropping all covers NET_RAW.
    if has(DropCaps) {
        push(&mut args, &["--cap-drop=ALL"]);
    } else if has(NoRawPackets) {
        push(&mut args, &["--cap-drop=NET_RAW"]);
    }

    if has(ReadonlyOs) {
        push(&mut args, &["--read-only"]);
        tmpfs(&mut args, &READONLY_TMPFS);
    }

    if has(NoNewPrivs) {
        push(&mut args, &["--security-opt", "no-new-privileges:true"]);
    }
    if has(Apparmor) {
        push(&mut args, &["--security-opt", "apparmor=docker-default"]);
    }
    // Seccomp keeps the engine's default profile; no flag.

    if has(NetworkNone) {
        push(&mut args, &["--network=none"]);
    } else if has(DisableIpv6) {
        push(
            &mut args,
            &[
                "--sysctl",
                "net.ipv6.conf.all.disable_ipv6=1",
                "--sysctl",
                "net.ipv6.conf.default.disable_ipv6=1",
            ],
        );
    }
    if has(SecureDns) {
        push(&mut args, &["--dns=1.1.1.1", "--dns=1.0.0.1"]);
    }

    // The read-only mounts already cover /tmp and /var/tmp.
    if has(SecureTmp) && !has(ReadonlyOs) {
        tmpfs(&mut args, &SECURE_TMPFS);
    }

    if has(ResourceLimits) {
        push(&mut args, &["--memory=512m", "--cpus=2"]);
    } else if has(ResourceLimitsMedium) {
        push(&mut args, &["--memory=2g", "--cpus=4"]);
    } else if has(ResourceLimitsHeavy) {
        push(&mut args, &["--memory=4g", "--cpus=8"]);
    }

    let workspace_mount = if has(EphemeralWorkspace) {
        TMPFS_WORKSPACE_MOUNT
    } else {
        BIND_WORKSPACE_MOUNT
    };
    let vscode_security = has(VscodeSecurity);

    RuntimeDirectives {
        effective,
        run_args: args,
        workspace_mount,
        vscode_security,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HardeningOption::*;

    fn count(args: &[String], flag: &str) -> usize {
        args.iter().filter(|a| a.as_str() == flag).count()
    }

    #[test]
    fn test_empty_set_has_no_flags() {
        let d = directives(&[]);
        assert!(d.run_args.is_empty());
        assert_eq!(d.workspace_mount, BIND_WORKSPACE_MOUNT);
        assert!(!d.vscode_security);
    }

    #[test]
    fn test_network_none_beats_secure_dns() {
        let d = directives(&[SecureDns, NetworkNone, DisableIpv6]);
        assert_eq!(d.effective, vec![NetworkNone]);
        assert_eq!(d.run_args, vec!["--network=none"]);
    }

    #[test]
    fn test_lightest_resource_tier_wins() {
        let d = directives(&[ResourceLimitsHeavy, ResourceLimitsMedium]);
        assert_eq!(d.effective, vec![ResourceLimitsMedium]);
        assert_eq!(d.run_args, vec!["--memory=2g", "--cpus=4"]);
    }

    #[test]
    fn test_drop_caps_subsumes_raw_packets() {
        let d = directives(&[NoRawPackets, DropCaps]);
        assert_eq!(d.run_args, vec!["--cap-drop=ALL"]);
        assert_eq!(d.effective, vec![DropCaps, NoRawPackets]);
    }

    #[test]
    fn test_readonly_subsumes_secure_tmp() {
        let d = directives(&[SecureTmp, ReadonlyOs]);
        assert_eq!(count(&d.run_args, "--read-only"), 1);
        assert_eq!(count(&d.run_args, "/tmp:rw,noexec,nosuid,size=512m"), 1);
        assert_eq!(count(&d.run_args, "--tmpfs"), READONLY_TMPFS.len());

        let d = directives(&[SecureTmp]);
        assert_eq!(count(&d.run_args, "--tmpfs"), 2);
    }

    #[test]
    fn test_secure_dns_with_ipv6() {
        let d = directives(&[SecureDns, DisableIpv6, NoNewPrivs]);
        assert_eq!(
            d.run_args,
            vec![
                "--security-opt",
                "no-new-privileges:true",
                "--sysctl",
                "net.ipv6.conf.all.disable_ipv6=1",
                "--sysctl",
                "net.ipv6.conf.default.disable_ipv6=1",
                "--dns=1.1.1.1",
                "--dns=1.0.0.1",
            ]
        );
    }

    #[test]
    fn test_manifest_only_options() {
        let d = directives(&[EphemeralWorkspace, VscodeSecurity, Seccomp]);
        assert!(d.run_args.is_empty());
        assert!(d.is_ephemeral());
        assert!(d.vscode_security);
        assert_eq!(d.workspace_mount, TMPFS_WORKSPACE_MOUNT);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let keys = vec!["drop-caps".to_string(), "superglue".to_string()];
        assert!(matches!(
            parse_hardening(&keys).unwrap_err(),
            WizardError::UnknownHardening(k) if k == "superglue"
        ));
    }
}
