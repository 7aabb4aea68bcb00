//! Terminal I/O boundary.
//!
//! Prompts only see the [`Console`] trait: a source of raw key records and
//! ticks, plus a sink for whole frames. [`TuiConsole`] backs it with crossterm
//! raw mode and a ratatui terminal; [`ScriptedConsole`] replays a fixed key
//! script and records every frame, which is how the prompt engine and the
//! wizard are tested without a terminal.

use std::collections::VecDeque;
use std::io::{stdout, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Terminal;
use tracing::{debug, warn};

use crate::error::{Result, WizardError};
use crate::prompt::{plain_text, RawKey};

/// One item from the input channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Key(RawKey),
    /// No key arrived within the timeout.
    Tick,
}

pub trait Console {
    /// Wait up to `timeout` for the next key.
    fn next_input(&mut self, timeout: Duration) -> Result<Input>;

    /// Replace the screen contents with `frame`.
    fn draw(&mut self, frame: &Text<'_>) -> Result<()>;

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;
}

// ============================================================================
// Real terminal
// ============================================================================

/// Raw-mode alternate-screen console. Dropping it restores the terminal.
pub struct TuiConsole {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TuiConsole {
    pub fn new() -> Result<Self> {
        debug!("Initializing terminal for prompts");

        enable_raw_mode()
            .map_err(|e| WizardError::terminal(format!("Failed to enable raw mode: {}", e)))?;
        if let Err(e) = crossterm::execute!(stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(WizardError::terminal(format!(
                "Failed to enter alternate screen: {}",
                e
            )));
        }

        match Terminal::new(CrosstermBackend::new(stdout())) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore_terminal();
                Err(WizardError::terminal(format!(
                    "Failed to create terminal: {}",
                    e
                )))
            }
        }
    }
}

impl Console for TuiConsole {
    fn next_input(&mut self, timeout: Duration) -> Result<Input> {
        if !event::poll(timeout)? {
            return Ok(Input::Tick);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Input::Key(key.into())),
            // Resizes and other events only need a redraw.
            _ => Ok(Input::Tick),
        }
    }

    fn draw(&mut self, frame: &Text<'_>) -> Result<()> {
        let paragraph = Paragraph::new(frame.clone()).wrap(Wrap { trim: false });
        self.terminal
            .draw(|f| f.render_widget(paragraph, f.area()))
            .map_err(|e| WizardError::terminal(format!("Failed to draw frame: {}", e)))?;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            self.terminal.show_cursor()?;
        } else {
            self.terminal.hide_cursor()?;
        }
        Ok(())
    }
}

impl Drop for TuiConsole {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.show_cursor() {
            warn!("Failed to show cursor: {}", e);
        }
        restore_terminal();
    }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

// ============================================================================
// Scripted console
// ============================================================================

/// Replays scripted input and records frames.
///
/// Running out of script is a terminal error, so a test that forgets a key
/// fails instead of hanging.
#[derive(Debug)]
pub struct ScriptedConsole {
    inputs: VecDeque<Input>,
    frames: Vec<String>,
    cursor_visible: bool,
    cursor_toggles: usize,
}

impl Default for ScriptedConsole {
    fn default() -> Self {
        Self {
            inputs: VecDeque::new(),
            frames: Vec::new(),
            cursor_visible: true,
            cursor_toggles: 0,
        }
    }
}

impl ScriptedConsole {
    pub fn new(keys: impl IntoIterator<Item = RawKey>) -> Self {
        let mut console = Self::default();
        console.push_keys(keys);
        console
    }

    pub fn push_key(&mut self, key: RawKey) -> &mut Self {
        self.inputs.push_back(Input::Key(key));
        self
    }

    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = RawKey>) -> &mut Self {
        self.inputs.extend(keys.into_iter().map(Input::Key));
        self
    }

    pub fn push_text(&mut self, text: &str) -> &mut Self {
        self.push_keys(RawKey::text(text))
    }

    pub fn push_tick(&mut self) -> &mut Self {
        self.inputs.push_back(Input::Tick);
        self
    }

    /// Every frame drawn so far, flattened to plain text.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn cursor_toggles(&self) -> usize {
        self.cursor_toggles
    }
}

impl Console for ScriptedConsole {
    fn next_input(&mut self, _timeout: Duration) -> Result<Input> {
        self.inputs
            .pop_front()
            .ok_or_else(|| WizardError::terminal("scripted input exhausted"))
    }

    fn draw(&mut self, frame: &Text<'_>) -> Result<()> {
        self.frames.push(plain_text(frame));
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.cursor_visible = visible;
        self.cursor_toggles += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{ask, Confirm, PromptResult, TextInput};

    #[test]
    fn test_scripted_console_drives_prompt() {
        let mut console = ScriptedConsole::new([RawKey::char('n'), RawKey::enter()]);
        let answer = ask(&mut console, Confirm::new("Continue?", true)).unwrap();
        assert_eq!(answer, PromptResult::Value(false));
        assert_eq!(console.frames().len(), 2);
        assert!(console.cursor_visible());
        assert_eq!(console.cursor_toggles(), 2);
    }

    #[test]
    fn test_exhausted_script_is_an_error() {
        let mut console = ScriptedConsole::default();
        let err = ask(&mut console, Confirm::new("Continue?", true)).unwrap_err();
        assert!(matches!(err, WizardError::Terminal(_)));
        assert!(console.cursor_visible());
    }

    #[test]
    fn test_interrupt_cancels_and_restores_cursor() {
        let mut console = ScriptedConsole::new([RawKey::char('a'), RawKey::ctrl('c')]);
        let err = ask(&mut console, TextInput::new("Name")).unwrap_err();
        assert!(err.is_cancelled());
        assert!(console.cursor_visible());
    }

    #[test]
    fn test_ticks_redraw_without_resolving() {
        let mut console = ScriptedConsole::default();
        console.push_tick().push_tick().push_key(RawKey::enter());
        let answer = ask(&mut console, TextInput::new("Name").with_default("x")).unwrap();
        assert_eq!(answer, PromptResult::Value("x".to_string()));
        assert_eq!(console.frames().len(), 3);
        assert_ne!(console.frames()[0], console.frames()[1]);
    }

    #[test]
    fn test_frames_carry_header() {
        let mut console = ScriptedConsole::new([RawKey::enter()]);
        ask(&mut console, Confirm::new("Continue?", true)).unwrap();
        assert!(console.last_frame().unwrap().contains("Devcontainer Wizard"));
    }
}
