//! UI primitives.
//!
//! - [`input`] - Single-line text input bound to a signal

pub mod input;

pub use input::TextInput;
