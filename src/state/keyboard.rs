//! Keyboard Module - Keyboard event types and command mapping
//!
//! Terminal-independent keyboard events plus the mapping from a key press to
//! what the greeter screen should do with it.
//!
//! # API
//!
//! - [`KeyboardEvent`] - A key with modifiers and press state
//! - [`Command`] - What a key means to the screen
//! - [`command_for`] - Map an event to a command
//!
//! # Example
//!
//! ```ignore
//! use spark_greeter::state::keyboard::{command_for, Command, KeyboardEvent, Modifiers};
//!
//! let event = KeyboardEvent::with_modifiers("c", Modifiers::ctrl());
//! assert_eq!(command_for(&event), Some(Command::Quit));
//! ```

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowLeft")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Press or auto-repeat; releases never edit.
    pub fn is_actionable(&self) -> bool {
        self.state != KeyState::Release
    }

    /// The printable character this event types, if any.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.ctrl || self.modifiers.alt {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// What a key press means to the greeter screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    WordLeft,
    WordRight,
    Home,
    End,
    DeleteWordBefore,
    ClearToStart,
    ClearToEnd,
}

/// Map a keyboard event to a screen command.
///
/// Returns `None` for releases and for keys the screen ignores.
pub fn command_for(event: &KeyboardEvent) -> Option<Command> {
    if !event.is_actionable() {
        return None;
    }

    let m = event.modifiers;

    if m.ctrl {
        return match event.key.as_str() {
            "c" => Some(Command::Quit),
            "a" => Some(Command::Home),
            "e" => Some(Command::End),
            "u" => Some(Command::ClearToStart),
            "k" => Some(Command::ClearToEnd),
            "w" | "h" | "Backspace" => Some(Command::DeleteWordBefore),
            "ArrowLeft" => Some(Command::WordLeft),
            "ArrowRight" => Some(Command::WordRight),
            _ => None,
        };
    }

    if m.alt {
        return match event.key.as_str() {
            "b" | "ArrowLeft" => Some(Command::WordLeft),
            "f" | "ArrowRight" => Some(Command::WordRight),
            "Backspace" => Some(Command::DeleteWordBefore),
            _ => None,
        };
    }

    match event.key.as_str() {
        "Escape" => Some(Command::Quit),
        "Backspace" => Some(Command::Backspace),
        "Delete" => Some(Command::Delete),
        "ArrowLeft" => Some(Command::Left),
        "ArrowRight" => Some(Command::Right),
        "Home" => Some(Command::Home),
        "End" => Some(Command::End),
        _ => event.printable().map(Command::Insert),
    }
}

// =============================================================================
// TESTS
// =============================================================================
