//! Input Primitive - Single-line text input bound to a signal.
//!
//! # Features
//!
//! - Two-way value binding via Signal
//! - Cursor navigation (arrows, home, end, word jumps)
//! - Text editing (backspace, delete, word delete, clear to start/end)
//! - Paste of multi-character text
//! - Horizontal viewport that keeps the cursor visible
//!
//! Every edit that changes the text writes the complete new value to the
//! bound signal, so anything observing it sees one change per keystroke.
//!
//! # Example
//!
//! ```ignore
//! use spark_greeter::primitives::TextInput;
//! use spark_greeter::state::Command;
//! use spark_signals::signal;
//!
//! let name = signal(String::new());
//! let field = TextInput::new(name.clone());
//! field.apply(Command::Insert('A'));
//! assert_eq!(name.get(), "A");
//! ```

use spark_signals::{Signal, signal};
use unicode_width::UnicodeWidthChar;

use crate::state::keyboard::Command;

// =============================================================================
// Word Boundary Helpers
// =============================================================================

/// Find the start of the word before the given position.
/// A word is defined as a sequence of alphanumeric characters.
fn find_word_start(chars: &[char], pos: usize) -> usize {
    let mut i = pos.min(chars.len());

    // Skip whitespace/punctuation going backward
    while i > 0 && !chars[i - 1].is_alphanumeric() {
        i -= 1;
    }

    // Skip word characters going backward
    while i > 0 && chars[i - 1].is_alphanumeric() {
        i -= 1;
    }

    i
}

/// Find the end of the word after the given position.
fn find_word_end(chars: &[char], pos: usize) -> usize {
    let len = chars.len();
    let mut i = pos.min(len);

    while i < len && !chars[i].is_alphanumeric() {
        i += 1;
    }

    while i < len && chars[i].is_alphanumeric() {
        i += 1;
    }

    i
}

// =============================================================================
// Viewport
// =============================================================================

/// Columns a character occupies (control characters count as zero).
fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Visible slice of `chars` for a field `width` columns wide.
///
/// Returns `(start, end, cursor_column)`: the character range to draw and
/// the cursor's column relative to the field. The cursor always lands
/// inside the field; one column is reserved for it at the end of the text.
pub fn visible_window(chars: &[char], cursor: usize, width: usize) -> (usize, usize, usize) {
    if width == 0 {
        return (0, 0, 0);
    }

    let cursor = cursor.min(chars.len());

    // Walk left from the cursor until the field is full
    let mut start = cursor;
    let mut used = 1; // cursor cell
    while start > 0 {
        let w = char_width(chars[start - 1]);
        if used + w > width {
            break;
        }
        used += w;
        start -= 1;
    }

    let cursor_column: usize = chars[start..cursor].iter().map(|&c| char_width(c)).sum();

    // Fill right of the cursor with what still fits
    let mut end = start;
    let mut columns = 0;
    while end < chars.len() {
        let w = char_width(chars[end]);
        if columns + w > width {
            break;
        }
        columns += w;
        end += 1;
    }
    let end = end.max(cursor);

    (start, end, cursor_column)
}

// =============================================================================
// TextInput
// =============================================================================

/// Editable single-line field.
///
/// `value` is shared with whoever owns the text (the greeter's name signal);
/// `cursor` is a character index owned by the field.
#[derive(Clone)]
pub struct TextInput {
    value: Signal<String>,
    cursor: Signal<usize>,
}

impl TextInput {
    /// Bind a field to `value`, cursor at the end of the current text.
    pub fn new(value: Signal<String>) -> Self {
        let len = value.get().chars().count();
        Self {
            value,
            cursor: signal(len),
        }
    }

    pub fn value(&self) -> String {
        self.value.get()
    }

    /// Cursor position in characters, clamped to the current text.
    pub fn cursor(&self) -> usize {
        self.cursor.get().min(self.value.get().chars().count())
    }

    pub fn cursor_signal(&self) -> Signal<usize> {
        self.cursor.clone()
    }

    /// Insert text at the cursor. Control characters (newlines from a
    /// paste, for instance) are dropped.
    pub fn insert_str(&self, text: &str) -> bool {
        let insert: Vec<char> = text.chars().filter(|c| !c.is_control()).collect();
        if insert.is_empty() {
            return false;
        }

        let mut chars: Vec<char> = self.value.get().chars().collect();
        let pos = self.cursor().min(chars.len());
        let count = insert.len();
        chars.splice(pos..pos, insert);

        self.commit(chars, pos + count);
        true
    }

    /// Apply an editing command. Returns true if the text or cursor changed.
    ///
    /// `Command::Quit` is not an editing command and is ignored here.
    pub fn apply(&self, command: Command) -> bool {
        let mut chars: Vec<char> = self.value.get().chars().collect();
        let len = chars.len();
        let pos = self.cursor().min(len);

        match command {
            Command::Insert(c) => {
                let mut buf = [0u8; 4];
                return self.insert_str(c.encode_utf8(&mut buf));
            }
            Command::Backspace => {
                if pos == 0 {
                    return false;
                }
                chars.remove(pos - 1);
                self.commit(chars, pos - 1);
            }
            Command::Delete => {
                if pos >= len {
                    return false;
                }
                chars.remove(pos);
                self.commit(chars, pos);
            }
            Command::DeleteWordBefore => {
                let start = find_word_start(&chars, pos);
                if start == pos {
                    return false;
                }
                chars.drain(start..pos);
                self.commit(chars, start);
            }
            Command::ClearToStart => {
                if pos == 0 {
                    return false;
                }
                chars.drain(..pos);
                self.commit(chars, 0);
            }
            Command::ClearToEnd => {
                if pos >= len {
                    return false;
                }
                chars.truncate(pos);
                self.commit(chars, pos);
            }
            Command::Left => return self.move_to(pos.saturating_sub(1)),
            Command::Right => return self.move_to((pos + 1).min(len)),
            Command::WordLeft => return self.move_to(find_word_start(&chars, pos)),
            Command::WordRight => return self.move_to(find_word_end(&chars, pos)),
            Command::Home => return self.move_to(0),
            Command::End => return self.move_to(len),
            Command::Quit => return false,
        }

        true
    }

    fn move_to(&self, pos: usize) -> bool {
        if pos == self.cursor() {
            return false;
        }
        self.cursor.set(pos);
        true
    }

    /// Write text then cursor, so the cursor never points past the text.
    fn commit(&self, chars: Vec<char>, cursor: usize) {
        self.value.set(chars.into_iter().collect());
        self.cursor.set(cursor);
    }
}

// =============================================================================
// Tests
// =============================================================================
