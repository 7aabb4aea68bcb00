//! Compound hardening step.
//!
//! A method select routes to either a profile select or the manual sequence
//! (file system, container, network, application, resources). Back from any
//! nested prompt backs out of the whole step; nothing is committed until the
//! last prompt resolves.
//!
//! The manual sequence cannot produce a conflicting set: network isolation and
//! DNS hardening are alternatives of one select, and the resource tiers are a
//! single select.

use strum::IntoEnumIterator;
use tracing::debug;

use super::state::{Answer, WizardState};
use crate::console::Console;
use crate::error::Result;
use crate::profiles::{resolve_profile, SecurityProfile};
use crate::prompt::{ask, Checkbox, Choice, PromptResult, Select};
use crate::types::{HardeningGroup, HardeningOption};

/// How the hardening set is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardeningMethod {
    Profile,
    Manual,
}

/// Network policy picked in the manual flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkPolicy {
    Normal,
    SecureDns,
    Isolated,
}

macro_rules! step {
    ($prompt:expr) => {
        match $prompt {
            PromptResult::Value(v) => v,
            PromptResult::Back => return Ok(PromptResult::Back),
        }
    };
}

pub fn method_prompt(prior: &WizardState) -> Select<HardeningMethod> {
    let default = if prior.hardening.is_some() && prior.hardening_profile.is_none() {
        HardeningMethod::Manual
    } else {
        HardeningMethod::Profile
    };

    Select::new(
        "How would you like to configure security hardening?",
        vec![
            Choice::new("Use security profiles", HardeningMethod::Profile)
                .with_description("Choose from predefined security configurations"),
            Choice::new("Manual selection", HardeningMethod::Manual)
                .with_description("Manually select individual security hardening options"),
        ],
    )
    .allow_back(true)
    .with_default(&default)
}

pub fn profile_prompt(prior: Option<&str>) -> Select<SecurityProfile> {
    let mut choices = Vec::new();
    let mut separated = false;
    for profile in SecurityProfile::iter() {
        if profile.is_experimental() && !separated {
            choices.push(Choice::separator("——— Experimental Profiles ———"));
            separated = true;
        }
        choices.push(
            Choice::new(profile.label(), profile)
                .with_description(profile.description())
                .with_caveat(profile.caveat()),
        );
    }

    let mut select = Select::new("Select one security profile:", choices).allow_back(true);
    if let Some(profile) = prior.and_then(|p| p.parse::<SecurityProfile>().ok()) {
        select = select.with_default(&profile);
    }
    select
}

fn group_prompt(
    message: &str,
    group: HardeningGroup,
    only: &[HardeningOption],
    prior: &[HardeningOption],
) -> Checkbox<HardeningOption> {
    let choices = HardeningOption::in_group(group)
        .into_iter()
        .filter(|o| only.is_empty() || only.contains(o))
        .map(|option| {
            Choice::new(option.label(), option)
                .with_description(option.description())
                .preselected(prior.contains(&option))
        })
        .collect();
    Checkbox::new(message, choices).allow_back(true)
}

pub fn network_prompt(prior: &[HardeningOption]) -> Select<NetworkPolicy> {
    let default = if prior.contains(&HardeningOption::NetworkNone) {
        NetworkPolicy::Isolated
    } else if prior.contains(&HardeningOption::SecureDns) {
        NetworkPolicy::SecureDns
    } else {
        NetworkPolicy::Normal
    };

    Select::new(
        "Network Configuration",
        vec![
            Choice::new("Normal networking", NetworkPolicy::Normal)
                .with_description("Standard container networking"),
            Choice::new(HardeningOption::SecureDns.label(), NetworkPolicy::SecureDns)
                .with_description(HardeningOption::SecureDns.description()),
            Choice::new(HardeningOption::NetworkNone.label(), NetworkPolicy::Isolated)
                .with_description(HardeningOption::NetworkNone.description()),
        ],
    )
    .allow_back(true)
    .with_default(&default)
}

pub fn resources_prompt(prior: &[HardeningOption]) -> Select<Option<HardeningOption>> {
    let mut choices =
        vec![Choice::new("No limits", None).with_description("No resource constraints")];
    choices.extend(
        HardeningOption::in_group(HardeningGroup::Resources)
            .into_iter()
            .map(|tier| Choice::new(tier.label(), Some(tier)).with_description(tier.description())),
    );

    let default = prior.iter().copied().find(HardeningOption::is_resource_tier);
    Select::new("Resource Limits", choices)
        .allow_back(true)
        .with_default(&default)
}

fn prior_options(prior: &WizardState) -> Vec<HardeningOption> {
    prior
        .hardening()
        .iter()
        .filter_map(|key| key.parse().ok())
        .collect()
}

fn keys(options: impl IntoIterator<Item = HardeningOption>) -> Vec<String> {
    options.into_iter().map(|o| o.to_string()).collect()
}

/// Run the whole step.
pub fn run(console: &mut dyn Console, prior: &WizardState) -> Result<PromptResult<Answer>> {
    let method = step!(ask(console, method_prompt(prior))?);
    debug!("Hardening method: {:?}", method);

    match method {
        HardeningMethod::Profile => {
            let profile = step!(ask(
                console,
                profile_prompt(prior.hardening_profile.as_deref())
            )?);
            let key = profile.to_string();
            let options = resolve_profile(&key)?;
            Ok(PromptResult::Value(Answer::Hardening {
                options: keys(options),
                profile: Some(key),
            }))
        }
        HardeningMethod::Manual => run_manual(console, &prior_options(prior)),
    }
}

fn run_manual(
    console: &mut dyn Console,
    prior: &[HardeningOption],
) -> Result<PromptResult<Answer>> {
    let mut selected: Vec<HardeningOption> = Vec::new();

    selected.extend(step!(ask(
        console,
        group_prompt("File System Security", HardeningGroup::FileSystem, &[], prior)
    )?));

    selected.extend(step!(ask(
        console,
        group_prompt("Container Security", HardeningGroup::Container, &[], prior)
    )?));

    match step!(ask(console, network_prompt(prior))?) {
        NetworkPolicy::Normal => {}
        NetworkPolicy::Isolated => selected.push(HardeningOption::NetworkNone),
        NetworkPolicy::SecureDns => {
            selected.push(HardeningOption::SecureDns);
            selected.extend(step!(ask(
                console,
                group_prompt(
                    "Additional Network Security (compatible with DNS)",
                    HardeningGroup::Network,
                    &[HardeningOption::DisableIpv6, HardeningOption::NoRawPackets],
                    prior,
                )
            )?));
        }
    }

    selected.extend(step!(ask(
        console,
        group_prompt("Application Security", HardeningGroup::Application, &[], prior)
    )?));

    if let Some(tier) = step!(ask(console, resources_prompt(prior))?) {
        selected.push(tier);
    }

    selected.sort();
    selected.dedup();
    Ok(PromptResult::Value(Answer::Hardening {
        options: keys(selected),
        profile: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::prompt::RawKey;

    fn hardening(answer: PromptResult<Answer>) -> (Vec<String>, Option<String>) {
        match answer {
            PromptResult::Value(Answer::Hardening { options, profile }) => (options, profile),
            other => panic!("unexpected answer: {:?}", other),
        }
    }

    #[test]
    fn test_profile_flow() {
        // Profile method, then down twice to "Isolated".
        let mut console = ScriptedConsole::new([
            RawKey::enter(),
            RawKey::down(),
            RawKey::down(),
            RawKey::enter(),
        ]);
        let (options, profile) = hardening(run(&mut console, &WizardState::new()).unwrap());
        assert_eq!(profile.as_deref(), Some("isolated"));
        assert!(options.contains(&"network-none".to_string()));
        assert!(options.contains(&"readonly-os".to_string()));
    }

    #[test]
    fn test_back_from_profile_select_backs_out_of_step() {
        let mut console = ScriptedConsole::new([RawKey::enter(), RawKey::escape()]);
        assert!(run(&mut console, &WizardState::new()).unwrap().is_back());
    }

    #[test]
    fn test_manual_flow_with_secure_dns() {
        let mut console = ScriptedConsole::new([
            // Method: manual
            RawKey::down(),
            RawKey::enter(),
            // File system: secure-tmp
            RawKey::down(),
            RawKey::space(),
            RawKey::enter(),
            // Container: drop-caps
            RawKey::space(),
            RawKey::enter(),
            // Network: secure DNS
            RawKey::down(),
            RawKey::enter(),
            // Additional network: disable-ipv6
            RawKey::space(),
            RawKey::enter(),
            // Application: none
            RawKey::enter(),
            // Resources: medium
            RawKey::down(),
            RawKey::down(),
            RawKey::enter(),
        ]);
        let (options, profile) = hardening(run(&mut console, &WizardState::new()).unwrap());
        assert_eq!(profile, None);
        assert_eq!(
            options,
            vec![
                "secure-tmp",
                "drop-caps",
                "secure-dns",
                "disable-ipv6",
                "resource-limits-medium"
            ]
        );
    }

    #[test]
    fn test_manual_isolation_skips_dns_followup() {
        let mut console = ScriptedConsole::new([
            RawKey::down(),
            RawKey::enter(),
            RawKey::enter(),
            RawKey::enter(),
            RawKey::down(),
            RawKey::down(),
            RawKey::enter(),
            RawKey::enter(),
            RawKey::enter(),
        ]);
        let (options, _) = hardening(run(&mut console, &WizardState::new()).unwrap());
        assert_eq!(options, vec!["network-none"]);
        assert_eq!(console.remaining_inputs(), 0);
    }

    #[test]
    fn test_back_mid_manual_flow_commits_nothing() {
        let mut console = ScriptedConsole::new([
            RawKey::down(),
            RawKey::enter(),
            RawKey::space(),
            RawKey::enter(),
            RawKey::escape(),
        ]);
        assert!(run(&mut console, &WizardState::new()).unwrap().is_back());
    }

    #[test]
    fn test_prior_manual_answers_are_preselected() {
        let mut prior = WizardState::new();
        prior.commit(Answer::Hardening {
            options: vec!["readonly-os".to_string(), "resource-limits-heavy".to_string()],
            profile: None,
        });
        assert_eq!(method_prompt(&prior).active(), 1);

        let options = prior_options(&prior);
        let fs = group_prompt("fs", HardeningGroup::FileSystem, &[], &options);
        assert_eq!(fs.selected_values(), vec![HardeningOption::ReadonlyOs]);
        assert_eq!(resources_prompt(&options).active(), 3);
    }

    #[test]
    fn test_profile_prompt_separates_experimental() {
        let select = profile_prompt(Some("ci-like-local-runner"));
        // development, hardened, isolated, separator, network-restricted, ci-like
        assert_eq!(select.active(), 5);
    }
}
