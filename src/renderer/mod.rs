//! Terminal renderer.
//!
//! Turns a composed [`Frame`](crate::pipeline::frame::Frame) into terminal
//! output. Knows nothing about greetings or signals.

pub mod diff;

pub use diff::DiffRenderer;
