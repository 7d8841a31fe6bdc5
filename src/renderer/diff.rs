//! Differential renderer for the fullscreen greeter screen.
//!
//! Compares each row of the new frame to the previous frame and only
//! rewrites rows that changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each row: skip if identical to the previous frame, otherwise move
//!    to column 0, write its spans, clear to end of line
//! 3. Clear rows the previous frame had and this one does not
//! 4. Place (or hide) the cursor
//! 5. Write the whole batch to the target in one call

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};

use crate::pipeline::frame::Frame;
use crate::types::{Attr, Line, Style};

/// Differential renderer.
///
/// Keeps the previous frame to decide which rows need rewriting. Output is
/// batched into an internal buffer and handed to the target in one write.
pub struct DiffRenderer {
    output: Vec<u8>,
    previous: Option<Frame>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self {
            output: Vec::with_capacity(4096),
            previous: None,
        }
    }

    /// Whether a frame has been rendered since the last invalidate.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Forget the previous frame; the next render rewrites every row.
    ///
    /// Use this after terminal resize or when the screen is corrupted.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Render a frame to `target`, writing only changed rows.
    ///
    /// Returns true if anything besides the cursor was written.
    pub fn render<W: Write>(&mut self, frame: &Frame, target: &mut W) -> io::Result<bool> {
        self.output.clear();
        let mut has_changes = false;

        queue!(self.output, BeginSynchronizedUpdate, Hide)?;

        for (row, line) in frame.lines.iter().enumerate() {
            let unchanged = self
                .previous
                .as_ref()
                .and_then(|prev| prev.lines.get(row))
                .is_some_and(|prev| prev == line);
            if unchanged {
                continue;
            }

            has_changes = true;
            queue!(self.output, MoveTo(0, row as u16))?;
            write_line(&mut self.output, line)?;
            queue!(self.output, Clear(ClearType::UntilNewLine))?;
        }

        // Rows that disappeared since last frame
        let previous_rows = self.previous.as_ref().map_or(0, |prev| prev.lines.len());
        for row in frame.lines.len()..previous_rows {
            has_changes = true;
            queue!(self.output, MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
        }

        if let Some((x, y)) = frame.cursor {
            queue!(self.output, MoveTo(x, y), Show)?;
        }

        queue!(self.output, EndSynchronizedUpdate)?;

        target.write_all(&self.output)?;
        target.flush()?;

        self.previous = Some(frame.clone());
        Ok(has_changes)
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Write one row's spans, resetting style after each span.
fn write_line<W: Write>(out: &mut W, line: &Line) -> io::Result<()> {
    for span in &line.spans {
        apply_style(out, span.style)?;
        queue!(out, Print(&span.text))?;
        if span.style != Style::PLAIN {
            queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
    }
    Ok(())
}

fn apply_style<W: Write>(out: &mut W, style: Style) -> io::Result<()> {
    if let Some(color) = style.fg {
        queue!(out, SetForegroundColor(color))?;
    }

    let attrs = [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::UNDERLINE, Attribute::Underlined),
    ];
    for (flag, attribute) in attrs {
        if style.attrs.contains(flag) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::frame::{GREETING_ROW, compose_frame};
    use crate::types::GreetingState;

    fn render_to_string(renderer: &mut DiffRenderer, frame: &Frame) -> (bool, String) {
        let mut out = Vec::new();
        let changed = renderer.render(frame, &mut out).unwrap();
        (changed, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_first_render_writes_everything() {
        let mut renderer = DiffRenderer::new();
        assert!(!renderer.has_previous());

        let frame = compose_frame("Alice", 5, &GreetingState::Ready("Hello, Alice".into()), 80, 24);
        let (changed, out) = render_to_string(&mut renderer, &frame);

        assert!(changed);
        assert!(out.contains("Greeting App"));
        assert!(out.contains("Alice"));
        assert!(out.contains("Hello, Alice"));
        assert!(renderer.has_previous());
    }

    #[test]
    fn test_identical_frame_writes_no_rows() {
        let mut renderer = DiffRenderer::new();
        let frame = compose_frame("Bob", 3, &GreetingState::Pending, 80, 24);

        render_to_string(&mut renderer, &frame);
        let (changed, out) = render_to_string(&mut renderer, &frame);

        assert!(!changed);
        assert!(!out.contains("Greeting App"));
    }

    #[test]
    fn test_only_changed_row_rewritten() {
        let mut renderer = DiffRenderer::new();
        let pending = compose_frame("Bob", 3, &GreetingState::Pending, 80, 24);
        let ready = compose_frame("Bob", 3, &GreetingState::Ready("Hi, Bob".into()), 80, 24);

        render_to_string(&mut renderer, &pending);
        let (changed, out) = render_to_string(&mut renderer, &ready);

        assert!(changed);
        assert!(out.contains("Hi, Bob"));
        assert!(!out.contains("Greeting App"));
        assert_eq!(ready.row_text(GREETING_ROW as usize), "Hi, Bob");
    }

    #[test]
    fn test_invalidate_forces_full_redraw() {
        let mut renderer = DiffRenderer::new();
        let frame = compose_frame("", 0, &GreetingState::Idle, 80, 24);

        render_to_string(&mut renderer, &frame);
        renderer.invalidate();
        assert!(!renderer.has_previous());

        let (changed, out) = render_to_string(&mut renderer, &frame);
        assert!(changed);
        assert!(out.contains("Greeting App"));
    }

    #[test]
    fn test_greeting_cannot_inject_terminal_commands() {
        let mut renderer = DiffRenderer::new();
        let state = GreetingState::Ready("Hi\nthere\x1b[2J\x1b]0;pwned\x07".into());
        let frame = compose_frame("Bob", 3, &state, 80, 24);

        let (_, out) = render_to_string(&mut renderer, &frame);
        assert!(!out.contains('\n'));
        assert!(!out.contains("\x1b[2J"));
        assert!(!out.contains("\x1b]0;"));
        assert!(!out.contains('\x07'));
        assert!(out.contains("Hi\u{fffd}there"));
    }

    #[test]
    fn test_shrinking_frame_clears_rows() {
        let mut renderer = DiffRenderer::new();
        let tall = compose_frame("", 0, &GreetingState::Idle, 80, 24);
        let short = compose_frame("", 0, &GreetingState::Idle, 80, 3);

        render_to_string(&mut renderer, &tall);
        let (changed, _) = render_to_string(&mut renderer, &short);
        assert!(changed);
    }
}
