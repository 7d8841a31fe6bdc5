//! Error types.
//!
//! Configuration problems stop the program before the screen is mounted.
//! Request failures never do: they become [`GreetingState::Failed`] for the
//! name they were issued for.
//!
//! [`GreetingState::Failed`]: crate::types::GreetingState::Failed

use thiserror::Error;

/// Invalid or missing startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no greeting service URL configured (pass --api-url or set GREETER_API)")]
    MissingBaseUrl,
    #[error("invalid greeting service URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: url::ParseError },
    #[error("greeting service URL {0:?} cannot be used as a base")]
    NotABase(String),
}

/// A greeting request that did not produce a greeting.
///
/// The message already names the underlying cause, since it is what the
/// screen shows, so the wrapped errors are not reported again as sources.
#[derive(Debug, Error)]
pub enum GreetError {
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("could not read response body: {0}")]
    Body(reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(serde_json::Error),
    #[error("worker thread could not be started: {0}")]
    Spawn(std::io::Error),
    #[error(transparent)]
    Url(#[from] ConfigError),
}

impl From<serde_json::Error> for GreetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err)
    }
}
