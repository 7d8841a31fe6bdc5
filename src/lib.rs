//! # spark-greeter
//!
//! Reactive terminal greeter: type a name, see what the greeting service
//! says about it.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! ```text
//! key event → TextInput → name signal → request effect → worker thread
//!                                                            ↓
//! terminal ← render effect ← frame derived ← greeting signal ← correlation check
//! ```
//!
//! Every committed change of the name issues one request tagged with that
//! name. A response is applied only if its tag still equals the live name,
//! so a slow answer for an old name never overwrites a newer one.
//!
//! ## Modules
//!
//! - [`types`] - Greeting state, styled text
//! - [`config`] - CLI and environment configuration
//! - [`error`] - Error types
//! - [`net`] - Greeting service client
//! - [`state`] - Greeter signals, keyboard and input events
//! - [`primitives`] - Text input
//! - [`pipeline`] - Frame composition, render effect, mount / event loop
//! - [`renderer`] - Differential terminal output
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;
pub mod net;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

pub use types::*;

pub use config::{Cli, Config};
pub use error::{ConfigError, GreetError};
pub use net::{GreetingClient, HttpGreetingClient, greet_url};
pub use pipeline::{MountHandle, Screen, mount, run, tick, unmount};
pub use primitives::TextInput;
pub use state::{Greeter, Resolution};
