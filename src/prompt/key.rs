//! Key classification.
//!
//! Terminal drivers hand us `{name, sequence, ctrl, meta}` records. This
//! module turns one record into exactly one [`KeyKind`] without looking at
//! anything else about the terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One tokenized keystroke as delivered by the terminal driver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawKey {
    /// Symbolic key name (`up`, `return`, `a`, ...), when the driver knows one.
    pub name: Option<String>,
    /// Raw byte sequence the terminal produced.
    pub sequence: String,
    pub ctrl: bool,
    pub meta: bool,
}

/// Semantic key event consumed by the prompt state machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Space,
    Backspace,
    Delete,
    Home,
    End,
    Printable(char),
    /// Ctrl+C. Never reaches a prompt; the driver turns it into cancellation.
    Interrupt,
    Other,
}

impl RawKey {
    fn new(name: &str, sequence: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            sequence: sequence.to_string(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn up() -> Self {
        Self::new("up", "\x1b[A")
    }

    pub fn down() -> Self {
        Self::new("down", "\x1b[B")
    }

    pub fn right() -> Self {
        Self::new("right", "\x1b[C")
    }

    pub fn left() -> Self {
        Self::new("left", "\x1b[D")
    }

    pub fn enter() -> Self {
        Self::new("return", "\r")
    }

    pub fn escape() -> Self {
        Self::new("escape", "\x1b")
    }

    pub fn space() -> Self {
        Self::new("space", " ")
    }

    pub fn backspace() -> Self {
        Self::new("backspace", "\x7f")
    }

    pub fn delete() -> Self {
        Self::new("delete", "\x1b[3~")
    }

    pub fn home() -> Self {
        Self::new("home", "\x1b[H")
    }

    pub fn end() -> Self {
        Self::new("end", "\x1b[F")
    }

    /// A plain character key.
    pub fn char(c: char) -> Self {
        let name = if c.is_ascii_alphanumeric() {
            Some(c.to_ascii_lowercase().to_string())
        } else {
            None
        };
        Self {
            name,
            sequence: c.to_string(),
            ctrl: false,
            meta: false,
        }
    }

    /// A control combination such as Ctrl+C.
    pub fn ctrl(c: char) -> Self {
        let lower = c.to_ascii_lowercase();
        let byte = (lower as u8) & 0x1f;
        Self {
            name: Some(lower.to_string()),
            sequence: char::from(byte).to_string(),
            ctrl: true,
            meta: false,
        }
    }

    /// One record per character, for scripting typed text.
    pub fn text(s: &str) -> Vec<Self> {
        s.chars()
            .map(|c| if c == ' ' { Self::space() } else { Self::char(c) })
            .collect()
    }
}

impl From<KeyEvent> for RawKey {
    fn from(event: KeyEvent) -> Self {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let meta = event.modifiers.contains(KeyModifiers::ALT);
        let mut key = match event.code {
            KeyCode::Up => Self::up(),
            KeyCode::Down => Self::down(),
            KeyCode::Left => Self::left(),
            KeyCode::Right => Self::right(),
            KeyCode::Enter => Self::enter(),
            KeyCode::Esc => Self::escape(),
            KeyCode::Backspace => Self::backspace(),
            KeyCode::Delete => Self::delete(),
            KeyCode::Home => Self::home(),
            KeyCode::End => Self::end(),
            KeyCode::Tab => Self::new("tab", "\t"),
            KeyCode::Char(c) if ctrl => Self::ctrl(c),
            KeyCode::Char(' ') => Self::space(),
            KeyCode::Char(c) => Self::char(c),
            _ => Self::default(),
        };
        key.ctrl = ctrl;
        key.meta = meta;
        key
    }
}

/// Classify one raw key record.
///
/// The symbolic name wins when present; otherwise the raw sequence is
/// matched against the escape sequences terminals commonly emit. A sequence
/// is printable only if it is a single non-control character.
pub fn classify(key: &RawKey) -> KeyKind {
    if key.ctrl {
        let is_c = key.name.as_deref() == Some("c") || key.sequence == "\x03";
        return if is_c { KeyKind::Interrupt } else { KeyKind::Other };
    }

    if let Some(kind) = key.name.as_deref().and_then(classify_name) {
        return kind;
    }

    if let Some(kind) = classify_sequence(&key.sequence) {
        return kind;
    }

    if key.meta {
        return KeyKind::Other;
    }

    let mut chars = key.sequence.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => KeyKind::Printable(c),
        _ => KeyKind::Other,
    }
}

fn classify_name(name: &str) -> Option<KeyKind> {
    let kind = match name {
        "up" => KeyKind::Up,
        "down" => KeyKind::Down,
        "left" => KeyKind::Left,
        "right" => KeyKind::Right,
        "return" | "enter" => KeyKind::Enter,
        "escape" => KeyKind::Escape,
        "space" => KeyKind::Space,
        "backspace" => KeyKind::Backspace,
        "delete" => KeyKind::Delete,
        "home" => KeyKind::Home,
        "end" => KeyKind::End,
        _ => return None,
    };
    Some(kind)
}

fn classify_sequence(sequence: &str) -> Option<KeyKind> {
    let kind = match sequence {
        "\x1b[A" | "\x1bOA" => KeyKind::Up,
        "\x1b[B" | "\x1bOB" => KeyKind::Down,
        "\x1b[C" | "\x1bOC" => KeyKind::Right,
        "\x1b[D" | "\x1bOD" => KeyKind::Left,
        "\x1b[H" | "\x1bOH" | "\x1b[1~" | "\x1b[7~" => KeyKind::Home,
        "\x1b[F" | "\x1bOF" | "\x1b[4~" | "\x1b[8~" => KeyKind::End,
        "\x1b[3~" => KeyKind::Delete,
        "\x1b" => KeyKind::Escape,
        "\r" | "\n" => KeyKind::Enter,
        "\x7f" | "\x08" => KeyKind::Backspace,
        " " => KeyKind::Space,
        "\x03" => KeyKind::Interrupt,
        _ => return None,
    };
    Some(kind)
}
