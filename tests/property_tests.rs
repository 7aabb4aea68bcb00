//! Property-Based Tests for the devcontainer wizard
//!
//! These tests verify:
//! - Prompt navigation and toggling invariants
//! - Viewport bounds
//! - Compiler determinism and dependency closure
//! - Hardening conflict resolution

use proptest::prelude::*;
use strum::IntoEnumIterator;

use devcontainer_wizard::logic::runtime::resolve_conflicts;
use devcontainer_wizard::logic::safe_folder_name;
use devcontainer_wizard::prompt::{viewport, Checkbox, Choice, KeyKind, Prompt, Select};
use devcontainer_wizard::types::CORE_RUNTIME_ORDER;
use devcontainer_wizard::{
    compile, Answer, HardeningOption, Language, ToolCategory, ToolKey, WizardState,
};

// =============================================================================
// Strategies
// =============================================================================

fn nav_key_strategy() -> impl Strategy<Value = KeyKind> {
    prop_oneof![Just(KeyKind::Up), Just(KeyKind::Down)]
}

/// A list mixing items, separators and disabled items.
fn choices_strategy() -> impl Strategy<Value = Vec<Choice<usize>>> {
    prop::collection::vec(0u8..3, 1..25).prop_map(|kinds| {
        kinds
            .into_iter()
            .enumerate()
            .map(|(index, kind)| match kind {
                0 => Choice::separator(format!("Group {}", index)),
                1 => Choice::new(format!("Disabled {}", index), index).disabled(),
                _ => Choice::new(format!("Item {}", index), index),
            })
            .collect()
    })
}

fn keys_of(category: ToolCategory) -> impl Strategy<Value = Vec<String>> {
    let offered: Vec<String> = ToolKey::offered_in(category)
        .into_iter()
        .map(|t| t.to_string())
        .collect();
    let len = offered.len();
    prop::sample::subsequence(offered, 0..=len)
}

fn state_strategy() -> impl Strategy<Value = WizardState> {
    let languages: Vec<String> = Language::iter().map(|l| l.to_string()).collect();
    let hardening: Vec<String> = HardeningOption::iter().map(|o| o.to_string()).collect();
    (
        prop::sample::subsequence(languages, 0..=2),
        keys_of(ToolCategory::Framework),
        keys_of(ToolCategory::FuzzingAndTesting),
        keys_of(ToolCategory::SecurityTooling),
        prop::sample::subsequence(hardening.clone(), 0..=hardening.len()),
    )
        .prop_map(|(languages, frameworks, fuzzing, security, hardening)| {
            let mut state = WizardState::new();
            state.commit(Answer::Languages(languages));
            state.commit(Answer::Frameworks(frameworks));
            state.commit(Answer::FuzzingAndTesting(fuzzing));
            state.commit(Answer::SecurityTooling(security));
            state.commit(Answer::Hardening {
                options: hardening,
                profile: None,
            });
            state
        })
}

// =============================================================================
// Prompt Property Tests
// =============================================================================

proptest! {
    /// Checkbox: toggling the same entry twice restores the checked set
    #[test]
    fn checkbox_double_toggle_is_identity(
        choices in choices_strategy(),
        moves in prop::collection::vec(nav_key_strategy(), 0..30),
    ) {
        let mut checkbox = Checkbox::new("Pick", choices);
        for key in moves {
            checkbox.handle_key(key);
        }
        let before = checkbox.checked().clone();
        checkbox.handle_key(KeyKind::Space);
        checkbox.handle_key(KeyKind::Space);
        prop_assert_eq!(checkbox.checked(), &before);
    }

    /// Checkbox: the result follows list order, whatever the toggle order
    #[test]
    fn checkbox_result_in_list_order(
        choices in choices_strategy(),
        keys in prop::collection::vec(
            prop_oneof![Just(KeyKind::Up), Just(KeyKind::Down), Just(KeyKind::Space)],
            0..40,
        ),
    ) {
        let mut checkbox = Checkbox::new("Pick", choices);
        for key in keys {
            checkbox.handle_key(key);
        }
        let values = checkbox.selected_values();
        prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(values.len(), checkbox.checked().len());
    }

    /// Select: navigation stays in bounds and never rests on a separator or
    /// disabled entry when a selectable one exists
    #[test]
    fn select_navigation_stays_on_selectable(
        choices in choices_strategy(),
        moves in prop::collection::vec(nav_key_strategy(), 0..40),
    ) {
        let selectable: Vec<bool> = choices.iter().map(Choice::is_selectable).collect();
        let mut select = Select::new("Pick", choices).page_size(4);
        for key in moves {
            select.handle_key(key);
            prop_assert!(select.active() < selectable.len());
            if selectable.iter().any(|s| *s) {
                prop_assert!(selectable[select.active()]);
            }
        }
    }

    /// Viewport: the active row is always inside the visible window
    #[test]
    fn viewport_keeps_active_visible(
        len in 1usize..200,
        page_size in 1usize..20,
        offset in 0usize..200,
        active_seed in 0usize..200,
    ) {
        let active = active_seed % len;
        let next = viewport::follow(offset, active, len, page_size);
        let window = viewport::window(next, len, page_size);
        prop_assert!(window.contains(&active));
        prop_assert!(window.len() <= page_size);
    }
}

// =============================================================================
// Compiler Property Tests
// =============================================================================

proptest! {
    /// Compiling the same answers twice yields identical artifacts
    #[test]
    fn compile_is_deterministic(state in state_strategy()) {
        let first = compile(&state).unwrap();
        let second = compile(&state).unwrap();
        prop_assert_eq!(first.dockerfile(), second.dockerfile());
        prop_assert_eq!(first.manifest_json().unwrap(), second.manifest_json().unwrap());
    }

    /// Every implied tool is installed, and before the tool needing it
    #[test]
    fn required_tools_are_closed_and_ordered(state in state_strategy()) {
        let plan = compile(&state).unwrap();
        let tools = &plan.required_tools;
        let position = |t: &ToolKey| tools.iter().position(|x| x == t);

        for (index, tool) in tools.iter().enumerate() {
            for dep in tool.implies() {
                let dep_index = position(dep);
                prop_assert!(dep_index.is_some(), "{} needs {}", tool, dep);
                prop_assert!(dep_index.unwrap_or(usize::MAX) < index);
            }
        }

        let runtimes: Vec<ToolKey> = tools
            .iter()
            .copied()
            .take_while(ToolKey::is_core_runtime)
            .collect();
        let expected: Vec<ToolKey> = CORE_RUNTIME_ORDER
            .iter()
            .copied()
            .filter(|t| tools.contains(t))
            .collect();
        prop_assert_eq!(runtimes, expected);

        let mut unique = tools.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), tools.len());
    }

    /// Conflict resolution keeps a conflict-free subset
    #[test]
    fn resolved_hardening_is_conflict_free(
        options in prop::sample::subsequence(HardeningOption::iter().collect::<Vec<_>>(), 0..=15)
    ) {
        let kept = resolve_conflicts(&options);
        for a in &kept {
            prop_assert!(options.contains(a));
            for b in &kept {
                prop_assert!(!a.conflicts_with(b));
            }
        }
    }

    /// Folder names only use safe characters
    #[test]
    fn safe_folder_name_charset(name in ".{0,60}") {
        let folder = safe_folder_name(&name);
        prop_assert!(!folder.is_empty());
        prop_assert!(!folder.starts_with('-') && !folder.ends_with('-'));
        prop_assert!(folder
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')));
    }
}
