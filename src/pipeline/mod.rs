//! Reactive Pipeline
//!
//! Connects the greeter state to terminal output.
//!
//! # Pipeline Architecture
//!
//! ```text
//! name / cursor / greeting / terminal size → frame derived → render effect
//! ```
//!
//! - **frame derived** - Pure composition of the screen from current state
//! - **render effect** - Monitors the frame, diffs it, writes the terminal
//!
//! Only the render effect performs terminal I/O.

pub mod frame;
pub mod mount;
pub mod terminal;

pub use frame::{Frame, compose_frame};
pub use mount::{MountHandle, Screen, mount, run, tick, unmount};
pub use terminal::{set_terminal_size, terminal_height, terminal_width};
