//! Multi-choice list prompt.
//!
//! Checked entries are tracked by index. The resolved value lists the checked
//! values in their original list order, whatever order they were toggled in.

use std::collections::BTreeSet;

use ratatui::text::{Line, Span, Text};

use super::viewport::{self, DEFAULT_PAGE_SIZE};
use super::{
    first_selectable, footer_lines, message_line, move_down, move_up, preview_lines, Choice,
    KeyKind, Prompt, PromptResult, Status,
};
use crate::theme::{Styles, Symbols};

const HELP: &str = "(Press <space> to select, <enter> to submit)";

pub struct Checkbox<T> {
    message: String,
    choices: Vec<Choice<T>>,
    active: usize,
    checked: BTreeSet<usize>,
    allow_back: bool,
    page_size: usize,
    offset: usize,
}

impl<T: Clone> Checkbox<T> {
    pub fn new(message: impl Into<String>, choices: Vec<Choice<T>>) -> Self {
        let active = first_selectable(&choices);
        let checked = choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_selectable() && c.item().is_some_and(|i| i.preselected))
            .map(|(index, _)| index)
            .collect();

        Self {
            message: message.into(),
            choices,
            active,
            checked,
            allow_back: false,
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }

    pub fn allow_back(mut self, allow: bool) -> Self {
        self.allow_back = allow;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.offset = viewport::follow(0, self.active, self.choices.len(), self.page_size);
        self
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn checked(&self) -> &BTreeSet<usize> {
        &self.checked
    }

    /// Flip the active entry. No-op on separators and disabled entries.
    pub fn toggle_active(&mut self) {
        let selectable = self
            .choices
            .get(self.active)
            .is_some_and(Choice::is_selectable);
        if !selectable {
            return;
        }
        if !self.checked.remove(&self.active) {
            self.checked.insert(self.active);
        }
    }

    /// Checked values in list order.
    pub fn selected_values(&self) -> Vec<T> {
        self.checked
            .iter()
            .filter_map(|&index| self.choices.get(index))
            .filter_map(Choice::item)
            .map(|item| item.value.clone())
            .collect()
    }

    fn scroll(&mut self) {
        self.offset = viewport::follow(self.offset, self.active, self.choices.len(), self.page_size);
    }

    fn render_choice(&self, choice: &Choice<T>, index: usize, active: bool) -> Line<'static> {
        match choice {
            Choice::Separator(text) => Line::from(Span::styled(
                format!("{}{}", Symbols::SEPARATOR_INDENT, text),
                Styles::muted(),
            )),
            Choice::Item(item) if item.disabled => Line::from(Span::styled(
                format!("  {} {} (disabled)", Symbols::CHECKBOX_DISABLED, item.label),
                Styles::muted(),
            )),
            Choice::Item(item) => {
                let pointer = if active { Symbols::POINTER } else { " " };
                let (mark, mark_style) = if self.checked.contains(&index) {
                    (Symbols::CHECKBOX_CHECKED, Styles::success())
                } else {
                    (Symbols::CHECKBOX_UNCHECKED, Styles::muted())
                };
                let label_style = if active {
                    Styles::highlight()
                } else {
                    Default::default()
                };
                Line::from(vec![
                    Span::styled(format!("{} ", pointer), Styles::brand()),
                    Span::styled(mark.to_string(), mark_style),
                    Span::raw(" "),
                    Span::styled(item.label.clone(), label_style),
                ])
            }
        }
    }
}

impl<T: Clone> Prompt for Checkbox<T> {
    type Output = Vec<T>;

    fn handle_key(&mut self, key: KeyKind) -> Status<Vec<T>> {
        match key {
            KeyKind::Up => {
                self.active = move_up(&self.choices, self.active);
                self.scroll();
            }
            KeyKind::Down => {
                self.active = move_down(&self.choices, self.active);
                self.scroll();
            }
            KeyKind::Space | KeyKind::Right => self.toggle_active(),
            KeyKind::Enter => return Status::Done(PromptResult::Value(self.selected_values())),
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
            |choice, index, active| self.render_choice(choice, index, active),
        );
        lines.extend(page.lines);
        lines.extend(footer_lines(Some(HELP), self.allow_back));
        Text::from(lines)
    }
}
