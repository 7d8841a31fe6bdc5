//! Core types shared by the greeter state and the render pipeline.
//!
//! - [`GreetingState`] - What the greeting paragraph currently shows
//! - [`Attr`] / [`Style`] - Text styling for rendered lines
//! - [`Span`] / [`Line`] - Styled text the renderer writes verbatim

use crossterm::style::Color;

// =============================================================================
// Greeting State
// =============================================================================

/// Greeting shown for the current name.
///
/// Only [`GreetingState::Ready`] carries text that ends up on screen as the
/// greeting itself. `Idle` and `Pending` both render as an empty paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GreetingState {
    /// The name is empty; nothing requested.
    #[default]
    Idle,
    /// A request for the current name is in flight.
    Pending,
    /// The server answered for the current name.
    Ready(String),
    /// The request for the current name failed.
    Failed(String),
}

impl GreetingState {
    /// The greeting text, if one has arrived for the current name.
    pub fn greeting(&self) -> Option<&str> {
        match self {
            Self::Ready(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const UNDERLINE = 1 << 2;
    }
}

/// Foreground color plus attributes for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// `None` keeps the terminal's default foreground.
    pub fg: Option<Color>,
    pub attrs: Attr,
}

impl Style {
    pub const PLAIN: Style = Style { fg: None, attrs: Attr::NONE };

    pub fn attrs(attrs: Attr) -> Self {
        Self { fg: None, attrs }
    }

    pub fn fg(color: Color) -> Self {
        Self { fg: Some(color), attrs: Attr::NONE }
    }

    pub fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs |= attrs;
        self
    }
}

// =============================================================================
// Styled Text
// =============================================================================

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::PLAIN)
    }
}

/// One screen row made of spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_span(span: Span) -> Self {
        Self { spans: vec![span] }
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Concatenated text of every span, without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}
