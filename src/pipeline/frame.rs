//! Frame composition - what the greeter screen looks like.
//!
//! A pure function from state to styled rows. The mount module wraps it in
//! a derived so it recomputes whenever the name, cursor, greeting or
//! terminal size changes.
//!
//! ```text
//! Greeting App
//!
//! Name: Alice▏
//!
//! Hello, Alice
//!
//! Esc quit · ←/→ move · Ctrl+U clear
//! ```

use crossterm::style::Color;
use unicode_width::UnicodeWidthChar;

use crate::primitives::input::visible_window;
use crate::types::{Attr, GreetingState, Line, Span, Style};

pub const TITLE: &str = "Greeting App";
pub const NAME_LABEL: &str = "Name: ";
pub const FAILED_PREFIX: &str = "failed to load greeting: ";
pub const FOOTER: &str = "Esc quit · ←/→ move · Ctrl+W delete word · Ctrl+U clear";

/// Widest the name field grows, in columns.
pub const MAX_FIELD_WIDTH: usize = 40;

/// Row holding the name field.
pub const INPUT_ROW: u16 = 2;
/// Row holding the greeting paragraph.
pub const GREETING_ROW: u16 = 4;

/// A composed screen: rows top to bottom plus where the cursor sits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub lines: Vec<Line>,
    /// (column, row) of the text cursor, if it fits on screen.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    /// Row text without styling (tests, logs).
    pub fn row_text(&self, row: usize) -> String {
        self.lines.get(row).map(Line::text).unwrap_or_default()
    }
}

// =============================================================================
// Width helpers
// =============================================================================

fn str_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Cut `text` to at most `width` columns.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Replace control characters with U+FFFD.
///
/// Rows are printed verbatim, so a newline, ESC or BEL coming from the
/// greeting service must never reach the terminal.
pub fn displayable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { char::REPLACEMENT_CHARACTER } else { c })
        .collect()
}

/// Clip every span of a line so the whole line fits in `width` columns.
/// Control characters are replaced first so they count as visible columns.
fn clip_line(line: Line, width: usize) -> Line {
    let mut remaining = width;
    let mut clipped = Line::empty();
    for span in line.spans {
        if remaining == 0 {
            break;
        }
        let text = truncate_to_width(&displayable(&span.text), remaining);
        remaining -= str_width(&text);
        if !text.is_empty() {
            clipped.push(Span::new(text, span.style));
        }
    }
    clipped
}

// =============================================================================
// Composition
// =============================================================================

/// Columns available to the name field on a `width`-column terminal.
pub fn field_width(width: u16) -> usize {
    (width as usize)
        .saturating_sub(str_width(NAME_LABEL) + 1)
        .min(MAX_FIELD_WIDTH)
}

/// The greeting paragraph for a state.
///
/// `Idle` and `Pending` render as an empty row.
pub fn greeting_line(greeting: &GreetingState) -> Line {
    match greeting {
        GreetingState::Ready(text) => Line::from_span(Span::plain(text.clone())),
        GreetingState::Failed(message) => Line::from_span(Span::new(
            format!("{}{}", FAILED_PREFIX, message),
            Style::fg(Color::Red),
        )),
        GreetingState::Idle | GreetingState::Pending => Line::empty(),
    }
}

/// Compose the screen for the given state and terminal size.
pub fn compose_frame(
    name: &str,
    cursor: usize,
    greeting: &GreetingState,
    width: u16,
    height: u16,
) -> Frame {
    let cols = width as usize;
    let field = field_width(width);

    // Name field: visible slice of the text, padded so the underline spans
    // the whole field
    let chars: Vec<char> = name.chars().collect();
    let (start, end, cursor_column) = visible_window(&chars, cursor, field);
    let shown: String = chars[start..end].iter().collect();
    let padding = field.saturating_sub(str_width(&shown));

    let mut input = Line::from_span(Span::new(NAME_LABEL, Style::attrs(Attr::BOLD)));
    input.push(Span::new(
        format!("{}{}", shown, " ".repeat(padding)),
        Style::attrs(Attr::UNDERLINE),
    ));

    let lines = vec![
        Line::from_span(Span::new(TITLE, Style::attrs(Attr::BOLD))),
        Line::empty(),
        input,
        Line::empty(),
        greeting_line(greeting),
        Line::empty(),
        Line::from_span(Span::new(FOOTER, Style::attrs(Attr::DIM))),
    ];

    let lines: Vec<Line> = lines
        .into_iter()
        .take(height as usize)
        .map(|line| clip_line(line, cols))
        .collect();

    let cursor_x = str_width(NAME_LABEL) + cursor_column;
    let cursor = if field > 0 && cursor_x < cols && INPUT_ROW < height {
        Some((cursor_x as u16, INPUT_ROW))
    } else {
        None
    };

    Frame { lines, cursor }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_frame() {
        let frame = compose_frame("", 0, &GreetingState::Idle, 80, 24);

        assert_eq!(frame.row_text(0), TITLE);
        assert!(frame.row_text(INPUT_ROW as usize).starts_with(NAME_LABEL));
        assert_eq!(frame.row_text(GREETING_ROW as usize), "");
        assert_eq!(frame.cursor, Some((NAME_LABEL.len() as u16, INPUT_ROW)));
    }

    #[test]
    fn test_ready_greeting_displayed() {
        let state = GreetingState::Ready("Hello, Alice".to_string());
        let frame = compose_frame("Alice", 5, &state, 80, 24);

        assert_eq!(frame.row_text(GREETING_ROW as usize), "Hello, Alice");
        assert!(frame.row_text(INPUT_ROW as usize).starts_with("Name: Alice"));
        assert_eq!(frame.cursor, Some((11, INPUT_ROW)));
    }

    #[test]
    fn test_pending_shows_nothing() {
        let frame = compose_frame("Bob", 3, &GreetingState::Pending, 80, 24);
        assert_eq!(frame.row_text(GREETING_ROW as usize), "");
    }

    #[test]
    fn test_empty_greeting_shows_nothing() {
        let frame = compose_frame("Bob", 3, &GreetingState::Ready(String::new()), 80, 24);
        assert_eq!(frame.row_text(GREETING_ROW as usize), "");
    }

    #[test]
    fn test_failure_is_red_and_prefixed() {
        let state = GreetingState::Failed("server answered with status 500".to_string());
        let frame = compose_frame("Bob", 3, &state, 80, 24);

        let line = &frame.lines[GREETING_ROW as usize];
        assert!(line.text().starts_with(FAILED_PREFIX));
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn test_control_characters_in_greeting_replaced() {
        let state = GreetingState::Ready("Hi\nthere\x1b[2J\x1b]0;pwned\x07".to_string());
        let frame = compose_frame("Bob", 3, &state, 80, 24);

        let row = frame.row_text(GREETING_ROW as usize);
        assert_eq!(row, "Hi\u{fffd}there\u{fffd}[2J\u{fffd}]0;pwned\u{fffd}");
        assert!(!row.chars().any(char::is_control));
        assert_eq!(frame.lines.len(), 7);
    }

    #[test]
    fn test_control_characters_in_failure_replaced() {
        let state = GreetingState::Failed("bad\r\x1b[H".to_string());
        let frame = compose_frame("Bob", 3, &state, 80, 24);

        let row = frame.row_text(GREETING_ROW as usize);
        assert_eq!(row, format!("{}bad\u{fffd}\u{fffd}[H", FAILED_PREFIX));
    }

    #[test]
    fn test_replaced_characters_count_toward_width() {
        let state = GreetingState::Ready("\x1b\x1b\x1babcdef".to_string());
        let frame = compose_frame("Bob", 3, &state, 5, 24);
        assert_eq!(frame.row_text(GREETING_ROW as usize), "\u{fffd}\u{fffd}\u{fffd}ab");
    }

    #[test]
    fn test_field_width_capped() {
        assert_eq!(field_width(200), MAX_FIELD_WIDTH);
        assert_eq!(field_width(20), 20 - NAME_LABEL.len() - 1);
        assert_eq!(field_width(3), 0);
    }

    #[test]
    fn test_narrow_terminal_clips_rows() {
        let state = GreetingState::Ready("Hello, a very long greeting indeed".to_string());
        let frame = compose_frame("Alice", 5, &state, 10, 24);

        for line in &frame.lines {
            assert!(str_width(&line.text()) <= 10);
        }
        assert_eq!(frame.row_text(GREETING_ROW as usize), "Hello, a v");
    }

    #[test]
    fn test_short_terminal_drops_rows() {
        let frame = compose_frame("Alice", 5, &GreetingState::Idle, 80, 2);
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(frame.cursor, None);
    }

    #[test]
    fn test_long_name_scrolls_with_cursor() {
        let name = "x".repeat(100);
        let frame = compose_frame(&name, 100, &GreetingState::Pending, 80, 24);

        let (x, _) = frame.cursor.unwrap();
        assert!((x as usize) < NAME_LABEL.len() + MAX_FIELD_WIDTH);
        assert!((x as usize) >= NAME_LABEL.len());
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
