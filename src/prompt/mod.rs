//! Prompt primitives
//!
//! Each primitive is a small state machine with a pure key transition
//! (`handle_key`) and a pure renderer (`render`). [`ask`] drives one prompt
//! against a [`Console`] until it resolves with a value or with
//! [`PromptResult::Back`].
//!
//! - `key` - key classification
//! - `viewport` - list pagination
//! - `select` / `checkbox` / `text_input` / `confirm` - the primitives

pub mod checkbox;
pub mod confirm;
pub mod key;
pub mod select;
pub mod text_input;
pub mod viewport;

pub use checkbox::Checkbox;
pub use confirm::Confirm;
pub use key::{classify, KeyKind, RawKey};
pub use select::Select;
pub use text_input::{TextInput, Validator, Verdict};

use std::time::Duration;

use ratatui::text::{Line, Span, Text};
use tracing::debug;

use crate::console::{Console, Input};
use crate::error::{Result, WizardError};
use crate::theme::{self, Styles, Symbols};

/// Interval between cosmetic redraws (text cursor blink).
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

// ============================================================================
// Results
// ============================================================================

/// Outcome of a finished prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult<T> {
    Value(T),
    Back,
}

impl<T> PromptResult<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PromptResult<U> {
        match self {
            Self::Value(v) => PromptResult::Value(f(v)),
            Self::Back => PromptResult::Back,
        }
    }

    pub fn is_back(&self) -> bool {
        matches!(self, Self::Back)
    }
}

/// State after handling one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status<T> {
    Pending,
    Done(PromptResult<T>),
}

// ============================================================================
// Choices
// ============================================================================

/// A selectable list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceItem<T> {
    pub label: String,
    pub value: T,
    pub description: Option<String>,
    pub caveat: Option<String>,
    pub disabled: bool,
    pub preselected: bool,
}

/// List entry: a real item or a non-selectable group header.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice<T> {
    Item(ChoiceItem<T>),
    Separator(String),
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self::Item(ChoiceItem {
            label: label.into(),
            value,
            description: None,
            caveat: None,
            disabled: false,
            preselected: false,
        })
    }

    pub fn separator(text: impl Into<String>) -> Self {
        Self::Separator(text.into())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        if let Self::Item(item) = &mut self {
            item.description = Some(description.into());
        }
        self
    }

    pub fn with_caveat(mut self, caveat: impl Into<String>) -> Self {
        if let Self::Item(item) = &mut self {
            item.caveat = Some(caveat.into());
        }
        self
    }

    pub fn disabled(mut self) -> Self {
        if let Self::Item(item) = &mut self {
            item.disabled = true;
        }
        self
    }

    pub fn preselected(mut self, checked: bool) -> Self {
        if let Self::Item(item) = &mut self {
            item.preselected = checked;
        }
        self
    }

    pub fn item(&self) -> Option<&ChoiceItem<T>> {
        match self {
            Self::Item(item) => Some(item),
            Self::Separator(_) => None,
        }
    }

    /// Separators and disabled items can never become active.
    pub fn is_selectable(&self) -> bool {
        self.item().is_some_and(|item| !item.disabled)
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Initial active index: the first selectable entry, or 0 when none is.
pub(crate) fn first_selectable<T>(choices: &[Choice<T>]) -> usize {
    choices.iter().position(Choice::is_selectable).unwrap_or(0)
}

/// Nearest selectable entry above `active`, or `active` itself at the top.
pub(crate) fn move_up<T>(choices: &[Choice<T>], active: usize) -> usize {
    choices[..active.min(choices.len())]
        .iter()
        .rposition(Choice::is_selectable)
        .unwrap_or(active)
}

/// Nearest selectable entry below `active`, or `active` itself at the bottom.
pub(crate) fn move_down<T>(choices: &[Choice<T>], active: usize) -> usize {
    let start = active + 1;
    if start >= choices.len() {
        return active;
    }
    choices[start..]
        .iter()
        .position(Choice::is_selectable)
        .map_or(active, |i| start + i)
}

// ============================================================================
// Rendering helpers
// ============================================================================

/// Message line: diamond plus the bold question.
pub(crate) fn message_line(message: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", Symbols::DIAMOND), Styles::brand()),
        Span::styled(message.to_string(), Styles::description()),
    ])
}

/// Description and caveat of the highlighted item, shown above the list.
pub(crate) fn preview_lines<T>(choice: Option<&Choice<T>>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(item) = choice.and_then(Choice::item) {
        if let Some(description) = &item.description {
            lines.push(Line::from(Span::styled(
                description.clone(),
                Styles::description(),
            )));
        }
        if let Some(caveat) = &item.caveat {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", Symbols::TRIANGLE), Styles::warning()),
                Span::styled(caveat.clone(), Styles::warning()),
            ]));
        }
    }
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines
}

/// Trailing help and shortcut lines.
pub(crate) fn footer_lines(hint: Option<&str>, allow_back: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];
    if let Some(hint) = hint {
        lines.push(Line::from(Span::styled(hint.to_string(), Styles::muted())));
    }
    if let Some(footer) = theme::footer(allow_back, true) {
        lines.push(footer);
    }
    lines
}

// ============================================================================
// Driver
// ============================================================================

/// A prompt state machine.
pub trait Prompt {
    type Output;

    /// Apply one key. Interrupt never reaches this method.
    fn handle_key(&mut self, key: KeyKind) -> Status<Self::Output>;

    /// Periodic cosmetic update. Must not resolve the prompt.
    fn on_tick(&mut self) {}

    /// Current frame. A pure function of the prompt state.
    fn render(&self) -> Text<'static>;
}

/// Run `prompt` until it resolves.
///
/// Hides the cursor while the prompt is active and restores it afterwards,
/// also when the user interrupts. Ctrl+C surfaces as
/// [`WizardError::Cancelled`].
pub fn ask<P: Prompt>(console: &mut dyn Console, mut prompt: P) -> Result<PromptResult<P::Output>> {
    console.set_cursor_visible(false)?;
    let outcome = drive(console, &mut prompt);
    let restored = console.set_cursor_visible(true);
    let result = outcome?;
    restored?;
    Ok(result)
}

fn drive<P: Prompt>(console: &mut dyn Console, prompt: &mut P) -> Result<PromptResult<P::Output>> {
    loop {
        console.draw(&frame(prompt.render()))?;

        match console.next_input(BLINK_INTERVAL)? {
            Input::Tick => prompt.on_tick(),
            Input::Key(raw) => {
                let key = classify(&raw);
                if key == KeyKind::Interrupt {
                    debug!("Prompt interrupted by user");
                    return Err(WizardError::Cancelled);
                }
                if let Status::Done(result) = prompt.handle_key(key) {
                    return Ok(result);
                }
            }
        }
    }
}

/// Prefix a prompt frame with the wizard header.
fn frame(body: Text<'static>) -> Text<'static> {
    let mut lines = vec![theme::header(), Line::default()];
    lines.extend(body.lines);
    Text::from(lines)
}

/// Flatten a frame to plain text.
pub fn plain_text(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Vec<Choice<u8>> {
        vec![
            Choice::separator("Group"),
            Choice::new("a", 1),
            Choice::new("b", 2).disabled(),
            Choice::new("c", 3),
            Choice::separator("Other"),
        ]
    }

    #[test]
    fn test_first_selectable_skips_headers() {
        assert_eq!(first_selectable(&list()), 1);
        let none: Vec<Choice<u8>> = vec![Choice::separator("x"), Choice::new("d", 0).disabled()];
        assert_eq!(first_selectable(&none), 0);
        let empty: Vec<Choice<u8>> = Vec::new();
        assert_eq!(first_selectable(&empty), 0);
    }

    #[test]
    fn test_moves_skip_disabled_and_clamp() {
        let choices = list();
        assert_eq!(move_down(&choices, 1), 3);
        assert_eq!(move_down(&choices, 3), 3);
        assert_eq!(move_up(&choices, 3), 1);
        assert_eq!(move_up(&choices, 1), 1);
    }

    #[test]
    fn test_moves_on_empty_list() {
        let empty: Vec<Choice<u8>> = Vec::new();
        assert_eq!(move_down(&empty, 0), 0);
        assert_eq!(move_up(&empty, 0), 0);
    }

    #[test]
    fn test_builders_ignore_separators() {
        let sep: Choice<u8> = Choice::separator("x").disabled().with_description("d");
        assert_eq!(sep, Choice::Separator("x".to_string()));
        assert!(!sep.is_selectable());
    }

    #[test]
    fn test_prompt_result_map() {
        assert_eq!(PromptResult::Value(2).map(|v| v * 2), PromptResult::Value(4));
        assert!(PromptResult::<u8>::Back.map(|v| v + 1).is_back());
    }
}
