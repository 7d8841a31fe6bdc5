//! Reactive and input state.
//!
//! - [`greeting`] - Name/greeting signals and the request effect
//! - [`keyboard`] - Keyboard events and key-to-command mapping
//! - [`input`] - crossterm event conversion and polling

pub mod greeting;
pub mod input;
pub mod keyboard;

pub use greeting::{Greeter, Resolution};
pub use input::{InputEvent, poll_event};
pub use keyboard::{Command, KeyState, KeyboardEvent, Modifiers, command_for};
