//! Prompt primitives driven through `ask` with scripted input.

use devcontainer_wizard::prompt::{ask, Checkbox, Choice, Confirm, Select, TextInput, Verdict};
use devcontainer_wizard::{PromptResult, RawKey, ScriptedConsole};

fn numbers(count: usize) -> Vec<Choice<usize>> {
    (0..count).map(|n| Choice::new(format!("Item {}", n), n)).collect()
}

// ============================================================================
// Text input
// ============================================================================

#[test]
fn test_enter_before_typing_submits_trimmed_default() {
    let mut console = ScriptedConsole::new([RawKey::enter()]);
    let answer = ask(&mut console, TextInput::new("Name").with_default("  vault  ")).unwrap();
    assert_eq!(answer, PromptResult::Value("vault".to_string()));
}

#[test]
fn test_first_keystroke_replaces_default() {
    let mut console = ScriptedConsole::default();
    console.push_text("box").push_key(RawKey::enter());
    let answer = ask(&mut console, TextInput::new("Name").with_default("vault")).unwrap();
    assert_eq!(answer, PromptResult::Value("box".to_string()));
}

#[test]
fn test_backspace_before_typing_clears_default() {
    let mut console = ScriptedConsole::new([RawKey::backspace(), RawKey::enter()]);
    let answer = ask(&mut console, TextInput::new("Name").with_default("vault")).unwrap();
    assert_eq!(answer, PromptResult::Value(String::new()));
}

#[test]
fn test_rejected_value_shows_error_and_stays_open() {
    let mut console = ScriptedConsole::new([RawKey::enter()]);
    console.push_text("ok").push_key(RawKey::enter());
    let input = TextInput::new("Name").with_validator(|value| {
        Ok(if value.trim().is_empty() {
            Verdict::reject("Name cannot be empty")
        } else {
            Verdict::Accept
        })
    });

    let answer = ask(&mut console, input).unwrap();
    assert_eq!(answer, PromptResult::Value("ok".to_string()));
    assert!(console.frames()[1].contains("Name cannot be empty"));
    assert!(!console.last_frame().unwrap().contains("Name cannot be empty"));
}

#[test]
fn test_failing_validator_is_a_rejection() {
    let mut console = ScriptedConsole::new([RawKey::enter(), RawKey::escape()]);
    let input = TextInput::new("Path")
        .with_default("x")
        .with_validator(|_| Err(anyhow::anyhow!("disk on fire")))
        .allow_back(true);

    assert_eq!(ask(&mut console, input).unwrap(), PromptResult::Back);
    assert!(!console.frames()[1].contains("disk on fire"));
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_select_all_disabled_never_resolves_a_value() {
    let choices = vec![
        Choice::new("A", 'a').disabled(),
        Choice::new("B", 'b').disabled(),
    ];
    let mut console = ScriptedConsole::new([
        RawKey::enter(),
        RawKey::down(),
        RawKey::enter(),
        RawKey::escape(),
    ]);
    let answer = ask(&mut console, Select::new("Pick", choices).allow_back(true)).unwrap();
    assert_eq!(answer, PromptResult::Back);
}

#[test]
fn test_select_clamps_at_both_ends() {
    let mut console = ScriptedConsole::new([RawKey::up(), RawKey::up(), RawKey::enter()]);
    assert_eq!(
        ask(&mut console, Select::new("Pick", numbers(3))).unwrap(),
        PromptResult::Value(0)
    );

    let mut console = ScriptedConsole::new(vec![RawKey::down(); 10]);
    console.push_key(RawKey::enter());
    assert_eq!(
        ask(&mut console, Select::new("Pick", numbers(3))).unwrap(),
        PromptResult::Value(2)
    );
}

#[test]
fn test_select_escape_ignored_without_back() {
    let mut console = ScriptedConsole::new([RawKey::escape(), RawKey::enter()]);
    assert_eq!(
        ask(&mut console, Select::new("Pick", numbers(2))).unwrap(),
        PromptResult::Value(0)
    );
}

#[test]
fn test_long_list_scrolls_with_active_row() {
    let mut console = ScriptedConsole::new(vec![RawKey::down(); 12]);
    console.push_key(RawKey::enter());
    let answer = ask(&mut console, Select::new("Pick", numbers(20)).page_size(5)).unwrap();
    assert_eq!(answer, PromptResult::Value(12));

    let last = &console.frames()[console.frames().len() - 1];
    assert!(last.contains("Item 12"));
    assert!(!last.contains("Item 0\n"));
    assert!(last.contains("(Use arrow keys to reveal more choices)"));
}

#[test]
fn test_checkbox_submits_empty_selection() {
    let mut console = ScriptedConsole::new([RawKey::enter()]);
    let answer = ask(&mut console, Checkbox::new("Pick", numbers(3))).unwrap();
    assert_eq!(answer, PromptResult::Value(Vec::new()));
}

#[test]
fn test_checkbox_skips_separators() {
    let choices = vec![
        Choice::new("One", 1),
        Choice::separator("More"),
        Choice::new("Two", 2),
    ];
    let mut console = ScriptedConsole::new([RawKey::down(), RawKey::space(), RawKey::enter()]);
    assert_eq!(
        ask(&mut console, Checkbox::new("Pick", choices)).unwrap(),
        PromptResult::Value(vec![2])
    );
}

// ============================================================================
// Confirm
// ============================================================================

#[test]
fn test_confirm_keys_only_change_value_until_enter() {
    let mut console = ScriptedConsole::new([
        RawKey::char('y'),
        RawKey::char('n'),
        RawKey::char('q'),
        RawKey::enter(),
    ]);
    assert_eq!(
        ask(&mut console, Confirm::new("Continue?", true)).unwrap(),
        PromptResult::Value(false)
    );
}
