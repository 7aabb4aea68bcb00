//! Free-text prompt.
//!
//! A configured default is displayed but stays out of the edit buffer until
//! the first edit key. Enter before any edit submits the default. The first
//! Backspace or Delete discards the default for good and starts an empty
//! buffer.

use ratatui::text::{Line, Span, Text};
use tracing::warn;

use super::{footer_lines, message_line, KeyKind, Prompt, PromptResult, Status};
use crate::theme::{Styles, Symbols};

/// Shown when a validator fails instead of answering.
pub const GENERIC_REJECTION: &str = "Invalid input";

/// Validator decision for one candidate value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(String),
}

impl Verdict {
    pub fn reject(message: impl Into<String>) -> Self {
        Self::Reject(message.into())
    }
}

/// Submission-time validator. Returning `Err` counts as a rejection with
/// [`GENERIC_REJECTION`].
pub type Validator = Box<dyn Fn(&str) -> anyhow::Result<Verdict>>;

pub struct TextInput {
    message: String,
    default: Option<String>,
    value: Vec<char>,
    cursor: usize,
    has_started_typing: bool,
    error: Option<String>,
    validator: Option<Validator>,
    allow_back: bool,
    cursor_shown: bool,
}

impl TextInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            default: None,
            value: Vec::new(),
            cursor: 0,
            has_started_typing: false,
            error: None,
            validator: None,
            allow_back: false,
            cursor_shown: true,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_validator(
        mut self,
        validator: impl Fn(&str) -> anyhow::Result<Verdict> + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn allow_back(mut self, allow: bool) -> Self {
        self.allow_back = allow;
        self
    }

    /// Live edit buffer.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_started_typing(&self) -> bool {
        self.has_started_typing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Value Enter would submit right now.
    pub fn candidate(&self) -> String {
        if self.has_started_typing {
            self.value()
        } else {
            self.default.clone().unwrap_or_default()
        }
    }

    fn start_typing(&mut self) {
        if !self.has_started_typing {
            self.has_started_typing = true;
            self.value.clear();
            self.cursor = 0;
        }
    }

    fn insert(&mut self, c: char) {
        self.start_typing();
        self.value.insert(self.cursor, c);
        self.cursor += 1;
        self.error = None;
    }

    fn backspace(&mut self) {
        if !self.has_started_typing {
            self.start_typing();
        } else if self.cursor > 0 {
            self.cursor -= 1;
            self.value.remove(self.cursor);
        }
        self.error = None;
    }

    fn delete(&mut self) {
        if !self.has_started_typing {
            self.start_typing();
        } else if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
        self.error = None;
    }

    fn submit(&mut self) -> Status<String> {
        let candidate = self.candidate();
        let verdict = match &self.validator {
            None => Verdict::Accept,
            Some(validate) => match validate(&candidate) {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!("Validator failed for '{}': {:#}", self.message, e);
                    Verdict::reject(GENERIC_REJECTION)
                }
            },
        };

        match verdict {
            Verdict::Accept => Status::Done(PromptResult::Value(candidate.trim().to_string())),
            Verdict::Reject(message) => {
                self.error = Some(message);
                Status::Pending
            }
        }
    }

    fn input_spans(&self) -> Vec<Span<'static>> {
        let glyph = if self.cursor_shown {
            Symbols::TEXT_CURSOR
        } else {
            " "
        };

        if !self.has_started_typing {
            let mut spans = vec![Span::styled(glyph.to_string(), Styles::brand())];
            if let Some(default) = &self.default {
                spans.push(Span::styled(format!("({})", default), Styles::muted()));
            }
            return spans;
        }

        let before: String = self.value[..self.cursor].iter().collect();
        let after: String = self.value[self.cursor..].iter().collect();
        vec![
            Span::raw(before),
            Span::styled(glyph.to_string(), Styles::brand()),
            Span::raw(after),
        ]
    }
}

impl Prompt for TextInput {
    type Output = String;

    fn handle_key(&mut self, key: KeyKind) -> Status<String> {
        match key {
            KeyKind::Printable(c) => self.insert(c),
            KeyKind::Space => self.insert(' '),
            KeyKind::Backspace => self.backspace(),
            KeyKind::Delete => self.delete(),
            KeyKind::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyKind::Right => self.cursor = (self.cursor + 1).min(self.value.len()),
            KeyKind::Home => self.cursor = 0,
            KeyKind::End => self.cursor = self.value.len(),
            KeyKind::Enter => return self.submit(),
            KeyKind::Escape if self.allow_back => return Status::Done(PromptResult::Back),
            _ => {}
        }
        Status::Pending
    }

    fn on_tick(&mut self) {
        self.cursor_shown = !self.cursor_shown;
    }

    fn render(&self) -> Text<'static> {
        let mut lines = vec![message_line(&self.message)];

        let mut input = vec![Span::styled(format!("{} ", Symbols::POINTER), Styles::brand())];
        input.extend(self.input_spans());
        lines.push(Line::from(input));

        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("{} {}", Symbols::CIRCLE, error),
                Styles::error(),
            )));
        }

        lines.extend(footer_lines(None, self.allow_back));
        Text::from(lines)
    }
}
