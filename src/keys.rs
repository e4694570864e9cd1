//! Keystroke filter for numeric text entry.
//!
//! Keys arrive as DOM `KeyboardEvent.key` names (`"5"`, `","`, `"Backspace"`,
//! `"Enter"`).

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const ALLOWED_CHARS: &[char] = &['.', ',', '%', '-'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Tab,
    Enter,
    Escape,
    Other(String),
}

/// What the field does with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Let the character into the text.
    Insert,
    /// Navigation or editing key, handled by the input itself.
    Pass,
    /// Leave the field, committing the typed text.
    Commit,
    /// Swallow the keystroke.
    Reject,
}

impl Key {
    #[must_use]
    pub fn action(&self) -> KeyAction {
        match self {
            Self::Enter => KeyAction::Commit,
            Self::Backspace
            | Self::Delete
            | Self::ArrowLeft
            | Self::ArrowRight
            | Self::ArrowUp
            | Self::ArrowDown
            | Self::Home
            | Self::End
            | Self::Tab
            | Self::Escape => KeyAction::Pass,
            Self::Char(ch) if ch.is_ascii_digit() || ALLOWED_CHARS.contains(ch) => {
                KeyAction::Insert
            }
            Self::Char(_) | Self::Other(_) => KeyAction::Reject,
        }
    }
}

impl FromStr for Key {
    type Err = Infallible;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name {
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Self::Char(ch),
                    _ => Self::Other(other.to_string()),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "{ch}"),
            Self::Other(name) => f.write_str(name),
            named => write!(f, "{named:?}"),
        }
    }
}
