//! Logging setup.
//!
//! `RUST_LOG` filters as usual (default `info`). The interactive screen owns
//! stdout and stderr, so it logs only when a log file is given; the one-shot
//! path logs to stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Append to a file.
    File(&'a Path),
    Stderr,
    /// Drop everything.
    Off,
}

impl<'a> LogTarget<'a> {
    /// Pick a target for a run mode.
    pub fn for_mode(log_file: Option<&'a Path>, interactive: bool) -> Self {
        match (log_file, interactive) {
            (Some(path), _) => Self::File(path),
            (None, true) => Self::Off,
            (None, false) => Self::Stderr,
        }
    }
}

fn env_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?)
}

/// Install the global subscriber.
pub fn init(target: LogTarget<'_>) -> Result<()> {
    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter()?)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            Ok(())
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter()?)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
            Ok(())
        }
    }
}
