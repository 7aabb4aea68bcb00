//! Yes/no prompt.

use ratatui::text::{Line, Span, Text};

use super::{footer_lines, message_line, KeyKind, Prompt, PromptResult, Status};
use crate::theme::{Styles, Symbols};

pub struct Confirm {
    message: String,
    default: bool,
    value: bool,
    allow_back: bool,
}

impl Confirm {
    pub fn new(message: impl Into<String>, default: bool) -> Self {
        Self {
            message: message.into(),
            default,
            value: default,
            allow_back: false,
        }
    }

    pub fn allow_back(mut self, allow: bool) -> Self {
        self.allow_back = allow;
        self
    }

    pub fn value(&self) -> bool {
        self.value
    }

    fn option(label: &str, selected: bool) -> Vec<Span<'static>> {
        if selected {
            vec![
                Span::styled(format!("{} ", Symbols::POINTER), Styles::brand()),
                Span::styled(label.to_string(), Styles::highlight()),
            ]
        } else {
            vec![Span::styled(format!("  {}", label), Styles::muted())]
        }
    }
}

impl Prompt for Confirm {
    type Output = bool;

    fn handle_key(&mut self, key: KeyKind) -> Status<bool> {
        match key {
            KeyKind::Left | KeyKind::Right => self.value = !self.value,
            KeyKind::Printable('y' | 'Y') => self.value = true,
            KeyKind::Printable('n' | 'N') => self.value = false,
            KeyKind::Enter => return Status::Done(PromptResult::Value(self.value)),
            KeyKind::Escape if self.allow_back => return Status::Done(PromptResult::Back),
            _ => {}
        }
        Status::Pending
    }

    fn render(&self) -> Text<'static> {
        let hint = if self.default { "(Y/n)" } else { "(y/N)" };
        let mut question = message_line(&self.message);
        question
            .spans
            .push(Span::styled(format!(" {}", hint), Styles::muted()));

        let mut options = Self::option("Yes", self.value);
        options.push(Span::raw("   "));
        options.extend(Self::option("No", !self.value));

        let mut lines = vec![question, Line::from(options)];
        lines.extend(footer_lines(None, self.allow_back));
        Text::from(lines)
    }
}
