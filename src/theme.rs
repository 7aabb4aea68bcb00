//! Centralized theme and styling for the wizard
//!
//! Single source of truth for the colors, styles and glyphs used by the prompt
//! primitives and the console chrome (header, footer).
//!
//! # Usage
//! ```rust
//! use devcontainer_wizard::theme::{Colors, Styles, Symbols};
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::BRAND);
//! let pointer = Symbols::POINTER;
//! let highlight = Styles::highlight();
//! ```

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the wizard
pub struct Colors;

impl Colors {
    /// Brand accent - pointers, bullets, messages
    pub const BRAND: Color = Color::Rgb(230, 57, 70);

    /// Highlighted (active) choice text
    pub const HIGHLIGHT: Color = Color::White;

    /// Muted text - defaults, separators, hints
    pub const MUTED: Color = Color::DarkGray;

    /// Success feedback
    pub const SUCCESS: Color = Color::Green;

    /// Warning/caveat feedback
    pub const WARNING: Color = Color::Yellow;

    /// Error feedback
    pub const ERROR: Color = Color::Red;

    /// Secondary accent - shortcut keys
    pub const ACCENT: Color = Color::Cyan;
}

// =============================================================================
// GLYPHS
// =============================================================================

/// Glyphs shared by all prompts
pub struct Symbols;

impl Symbols {
    pub const BULLET: &'static str = "•";
    pub const POINTER: &'static str = "➤";
    pub const CHECK: &'static str = "✓";
    pub const CHECKBOX_CHECKED: &'static str = "[x]";
    pub const CHECKBOX_UNCHECKED: &'static str = "[ ]";
    pub const CHECKBOX_DISABLED: &'static str = " - ";
    pub const SEPARATOR_INDENT: &'static str = "  ";
    pub const TEXT_CURSOR: &'static str = "|";
    pub const DIAMOND: &'static str = "◆";
    pub const CIRCLE: &'static str = "●";
    pub const TRIANGLE: &'static str = "▲";
    pub const SPINNER_FRAMES: &'static [&'static str] = &["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"];
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common prompt patterns
pub struct Styles;

impl Styles {
    /// Brand-colored text (messages, pointers)
    pub fn brand() -> Style {
        Style::default().fg(Colors::BRAND)
    }

    /// Active choice
    pub fn highlight() -> Style {
        Style::default()
            .fg(Colors::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Muted/secondary text
    pub fn muted() -> Style {
        Style::default().fg(Colors::MUTED)
    }

    /// Bold description text
    pub fn description() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    /// Shortcut key labels in the footer
    pub fn key() -> Style {
        Style::default()
            .fg(Colors::ACCENT)
            .add_modifier(Modifier::BOLD)
    }
}

// =============================================================================
// CHROME
// =============================================================================

/// Title line painted above every prompt.
pub fn header() -> Line<'static> {
    Line::from(vec![
        Span::styled("✻ ", Styles::brand()),
        Span::styled("Devcontainer Wizard by The Red Guild", Styles::highlight()),
    ])
}

/// Shortcut footer listing the keys a prompt honours.
///
/// Returns `None` when neither shortcut applies.
pub fn footer(back: bool, exit: bool) -> Option<Line<'static>> {
    if !back && !exit {
        return None;
    }

    let mut spans = vec![Span::styled("Shortcuts:", Styles::muted())];
    if back {
        spans.push(Span::styled(" ESC ", Styles::key()));
        spans.push(Span::styled("Back", Styles::muted()));
    }
    if exit {
        spans.push(Span::styled(" CTRL+C ", Styles::key()));
        spans.push(Span::styled("Exit", Styles::muted()));
    }
    Some(Line::from(spans))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_footer_lists_enabled_shortcuts() {
        let line = footer(true, true).expect("footer");
        let text = plain(&line);
        assert!(text.contains("ESC"));
        assert!(text.contains("CTRL+C"));

        let line = footer(false, true).expect("footer");
        assert!(!plain(&line).contains("ESC"));
    }

    #[test]
    fn test_footer_absent_without_shortcuts() {
        assert!(footer(false, false).is_none());
    }

    #[test]
    fn test_header_mentions_wizard() {
        assert!(plain(&header()).contains("Devcontainer Wizard"));
    }
}
