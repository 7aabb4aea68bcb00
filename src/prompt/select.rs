//! Single-choice list prompt.
//!
//! The highlighted entry's description and caveat are shown above the list,
//! so the user can preview an option before committing to it.

use ratatui::text::{Line, Span, Text};

use super::viewport::{self, DEFAULT_PAGE_SIZE};
use super::{
    first_selectable, footer_lines, message_line, move_down, move_up, preview_lines, Choice,
    KeyKind, Prompt, PromptResult, Status,
};
use crate::theme::{Styles, Symbols};

const SCROLL_HINT: &str = "(Use arrow keys to reveal more choices)";

pub struct Select<T> {
    message: String,
    choices: Vec<Choice<T>>,
    active: usize,
    allow_back: bool,
    page_size: usize,
    offset: usize,
}

impl<T: Clone + PartialEq> Select<T> {
    pub fn new(message: impl Into<String>, choices: Vec<Choice<T>>) -> Self {
        let active = first_selectable(&choices);
        let mut select = Self {
            message: message.into(),
            choices,
            active,
            allow_back: false,
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
        };
        select.scroll();
        select
    }

    /// Let Escape resolve the prompt with [`PromptResult::Back`].
    pub fn allow_back(mut self, allow: bool) -> Self {
        self.allow_back = allow;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.scroll();
        self
    }

    /// Start on the entry holding `value`, if it is selectable.
    pub fn with_default(mut self, value: &T) -> Self {
        let found = self
            .choices
            .iter()
            .position(|c| c.is_selectable() && c.item().is_some_and(|i| &i.value == value));
        if let Some(index) = found {
            self.active = index;
            self.scroll();
        }
        self
    }

    pub fn active(&self) -> usize {
        self.active
    }

    fn scroll(&mut self) {
        self.offset = viewport::follow(self.offset, self.active, self.choices.len(), self.page_size);
    }

    fn render_choice(choice: &Choice<T>, active: bool) -> Line<'static> {
        match choice {
            Choice::Separator(text) => Line::from(Span::styled(
                format!("{}{}", Symbols::SEPARATOR_INDENT, text),
                Styles::muted(),
            )),
            Choice::Item(item) if item.disabled => Line::from(Span::styled(
                format!("  {} (disabled)", item.label),
                Styles::muted(),
            )),
            Choice::Item(item) if active => Line::from(vec![
                Span::styled(format!("{} ", Symbols::POINTER), Styles::brand()),
                Span::styled(item.label.clone(), Styles::highlight()),
            ]),
            Choice::Item(item) => Line::from(format!("  {}", item.label)),
        }
    }
}

impl<T: Clone + PartialEq> Prompt for Select<T> {
    type Output = T;

    fn handle_key(&mut self, key: KeyKind) -> Status<T> {
        match key {
            KeyKind::Up => {
                self.active = move_up(&self.choices, self.active);
                self.scroll();
            }
            KeyKind::Down => {
                self.active = move_down(&self.choices, self.active);
                self.scroll();
            }
            KeyKind::Enter => {
                if let Some(choice) = self.choices.get(self.active) {
                    if let (true, Some(item)) = (choice.is_selectable(), choice.item()) {
                        return Status::Done(PromptResult::Value(item.value.clone()));
                    }
                }
            }
            KeyKind::Escape if self.allow_back => return Status::Done(PromptResult::Back),
            _ => {}
        }
        Status::Pending
    }

    fn render(&self) -> Text<'static> {
        let mut lines = preview_lines(self.choices.get(self.active));
        lines.push(message_line(&self.message));

        let page = viewport::paginate(
            &self.choices,
            self.active,
            self.page_size,
            self.offset,
            |choice, _, active| Self::render_choice(choice, active),
        );
        lines.extend(page.lines);

        let hint = page.truncated.then_some(SCROLL_HINT);
        lines.extend(footer_lines(hint, self.allow_back));
        Text::from(lines)
    }
}
