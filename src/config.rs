//! Configuration - command line and environment.
//!
//! The greeting service root is the only required setting. It comes from
//! `--api-url` or the `GREETER_API` environment variable and is validated
//! once at startup.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use spark_greeter::config::{Cli, Config};
//!
//! let cli = Cli::parse();
//! let config = Config::from_cli(&cli)?;
//! println!("talking to {}", config.base_url);
//! ```

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the greeting service root.
pub const API_URL_ENV: &str = "GREETER_API";

/// Environment variable holding the log file path.
pub const LOG_FILE_ENV: &str = "GREETER_LOG_FILE";

// =============================================================================
// CLI
// =============================================================================

/// Type a name, get a greeting.
///
/// With NAME, fetch one greeting and print it. Without it, open the
/// interactive screen.
#[derive(Debug, Clone, Parser)]
#[command(name = "greeter", version, about)]
pub struct Cli {
    /// Root URL of the greeting service (requests go to <URL>/greet/<name>)
    #[arg(long = "api-url", env = API_URL_ENV, value_name = "URL")]
    pub api_url: Option<String>,

    /// Write logs to this file (the interactive screen owns stdout)
    #[arg(long = "log-file", env = LOG_FILE_ENV, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Fetch a single greeting for NAME and exit
    pub name: Option<String>,
}

// =============================================================================
// CONFIG
// =============================================================================

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: Url,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Build from parsed command line arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let raw = cli.api_url.as_deref().ok_or(ConfigError::MissingBaseUrl)?;
        Ok(Self {
            base_url: parse_base_url(raw)?,
            log_file: cli.log_file.clone(),
        })
    }

}

/// Parse and check a greeting service root.
///
/// Blank input counts as missing. `mailto:`-style URLs that cannot carry
/// path segments are rejected.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let url = Url::parse(trimmed).map_err(|reason| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason,
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABase(trimmed.to_string()));
    }

    Ok(url)
}
