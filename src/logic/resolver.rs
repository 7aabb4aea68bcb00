//! Tool Resolver
//!
//! Translates the wizard's language and tool selections into the ordered set
//! of tool keys to install.
//!
//! # Design
//!
//! - **Insertion order**: the first mention of a key fixes its position;
//!   dependencies are inserted ahead of the tool that implies them
//! - **Idempotent**: adding a key already present is a no-op
//! - **Pure logic**: no I/O; unknown keys are errors, never skipped
//!
//! # Resolution Rules
//!
//! | State Field         | Resolved To |
//! |---------------------|-------------|
//! | `languages`         | `Language::tools()` |
//! | `frameworks`        | Tool key + implied runtimes |
//! | `fuzzingAndTesting` | Tool key + implied runtimes |
//! | `securityTooling`   | Tool key + implied runtimes |

use std::str::FromStr;

use tracing::warn;

use crate::error::{Result, WizardError};
use crate::types::{Language, ToolCategory, ToolKey, CORE_RUNTIME_ORDER};
use crate::wizard::WizardState;

// ============================================================================
// Ordered set
// ============================================================================

/// Insertion-ordered set of tool keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSet {
    keys: Vec<ToolKey>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tool` after everything it implies. Returns false if present.
    pub fn insert(&mut self, tool: ToolKey) -> bool {
        if self.contains(tool) {
            return false;
        }
        for dep in tool.implies() {
            self.insert(*dep);
        }
        self.keys.push(tool);
        true
    }

    pub fn contains(&self, tool: ToolKey) -> bool {
        self.keys.contains(&tool)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn as_slice(&self) -> &[ToolKey] {
        &self.keys
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn parse_language(key: &str) -> Result<Language> {
    Language::from_str(key).map_err(|_| {
        warn!("Unknown language key: {}", key);
        WizardError::unknown_selection("language", key)
    })
}

fn parse_tool(key: &str, category: ToolCategory) -> Result<ToolKey> {
    let tool = ToolKey::from_str(key).map_err(|_| {
        warn!("Unknown tool key: {}", key);
        WizardError::UnknownTool(key.to_string())
    })?;
    if tool.category() != Some(category) {
        warn!("Tool {} is not a {} selection", key, category.name());
        return Err(WizardError::unknown_selection(category.name(), key));
    }
    Ok(tool)
}

/// Every tool the state needs, in order of first mention.
///
/// Categories are walked in wizard order: languages, frameworks, fuzzing &
/// testing, security tooling.
pub fn required_tools(state: &WizardState) -> Result<ToolSet> {
    let mut tools = ToolSet::new();

    for key in state.languages() {
        for tool in parse_language(key)?.tools() {
            tools.insert(*tool);
        }
    }

    let categories = [
        (ToolCategory::Framework, state.frameworks()),
        (ToolCategory::FuzzingAndTesting, state.fuzzing_and_testing()),
        (ToolCategory::SecurityTooling, state.security_tooling()),
    ];
    for (category, keys) in categories {
        for key in keys {
            tools.insert(parse_tool(key, category)?);
        }
    }

    Ok(tools)
}

/// Install order: core runtimes in their fixed order, then every other tool
/// in insertion order.
pub fn install_order(tools: &ToolSet) -> Vec<ToolKey> {
    let mut ordered: Vec<ToolKey> = CORE_RUNTIME_ORDER
        .iter()
        .copied()
        .filter(|t| tools.contains(*t))
        .collect();
    ordered.extend(tools.as_slice().iter().filter(|t| !t.is_core_runtime()));
    ordered
}

/// Extensions from the state plus any a selected tool needs, deduplicated
/// with the state's order kept.
pub fn resolve_extensions(state: &WizardState, tools: &ToolSet) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    let implied = tools
        .as_slice()
        .iter()
        .flat_map(|t| t.implied_extensions().iter().map(|e| e.to_string()));

    for ext in state.vscode_extensions().iter().cloned().chain(implied) {
        if !extensions.contains(&ext) {
            extensions.push(ext);
        }
    }
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DECOMPILER_EXTENSION;
    use crate::wizard::Answer;

    fn strings(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_insert_places_dependencies_first() {
        let mut tools = ToolSet::new();
        assert!(tools.insert(ToolKey::Foundry));
        assert!(!tools.insert(ToolKey::Rust));
        assert_eq!(tools.as_slice(), &[ToolKey::Rust, ToolKey::Foundry]);
    }

    #[test]
    fn test_required_tools_solidity_foundry() {
        let mut state = WizardState::new();
        state.commit(Answer::Languages(strings(&["solidity"])));
        state.commit(Answer::Frameworks(strings(&["foundry"])));

        let tools = required_tools(&state).unwrap();
        assert_eq!(
            tools.as_slice(),
            &[ToolKey::Python, ToolKey::SolcSelect, ToolKey::Rust, ToolKey::Foundry]
        );
    }

    #[test]
    fn test_unknown_language_is_an_error() {
        let mut state = WizardState::new();
        state.commit(Answer::Languages(strings(&["cobol"])));
        let err = required_tools(&state).unwrap_err();
        assert!(matches!(err, WizardError::UnknownSelection { category: "language", .. }));
    }

    #[test]
    fn test_unknown_tool_is_an_error() {
        let mut state = WizardState::new();
        state.commit(Answer::SecurityTooling(strings(&["hammer"])));
        assert!(matches!(
            required_tools(&state).unwrap_err(),
            WizardError::UnknownTool(_)
        ));
    }

    #[test]
    fn test_tool_in_wrong_category_is_an_error() {
        let mut state = WizardState::new();
        state.commit(Answer::Frameworks(strings(&["slither"])));
        assert!(matches!(
            required_tools(&state).unwrap_err(),
            WizardError::UnknownSelection { category: "framework", .. }
        ));
    }

    #[test]
    fn test_install_order_puts_runtimes_first() {
        let mut tools = ToolSet::new();
        tools.insert(ToolKey::Hardhat);
        tools.insert(ToolKey::Slither);
        tools.insert(ToolKey::Echidna);
        tools.insert(ToolKey::Aderyn);

        assert_eq!(
            install_order(&tools),
            vec![
                ToolKey::Rust,
                ToolKey::Go,
                ToolKey::Node,
                ToolKey::Hardhat,
                ToolKey::Python,
                ToolKey::Slither,
                ToolKey::Echidna,
                ToolKey::Aderyn,
            ]
        );
    }

    #[test]
    fn test_panoramix_adds_decompiler_once() {
        let mut state = WizardState::new();
        state.commit(Answer::SecurityTooling(strings(&["panoramix"])));
        state.commit(Answer::VscodeExtensions(strings(&["trailofbits.weaudit"])));
        let tools = required_tools(&state).unwrap();
        assert_eq!(
            resolve_extensions(&state, &tools),
            strings(&["trailofbits.weaudit", DECOMPILER_EXTENSION])
        );

        state.commit(Answer::VscodeExtensions(strings(&[DECOMPILER_EXTENSION])));
        assert_eq!(
            resolve_extensions(&state, &tools),
            strings(&[DECOMPILER_EXTENSION])
        );
    }
}
