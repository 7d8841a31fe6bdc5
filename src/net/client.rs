//! Greeting service client.
//!
//! One call, one shape:
//!
//! ```text
//! GET <base>/greet/<name>        Accept: application/json
//! 200 {"greeting": "Hello, Alice"}
//! ```
//!
//! The client is blocking and `Send + Sync`; the greeter runs each request on
//! its own worker thread so the screen never waits on the network.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, GreetError};

const USER_AGENT: &str = concat!("spark-greeter/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// CLIENT TRAIT
// =============================================================================

/// Something that can turn a name into a greeting.
pub trait GreetingClient: Send + Sync {
    /// Fetch the greeting for `name`. Blocks until the request completes.
    fn fetch(&self, name: &str) -> Result<String, GreetError>;
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// Response body. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct GreetResponse {
    #[serde(default)]
    greeting: Option<String>,
}

/// Decode a response body into the greeting text.
///
/// A body without `greeting` yields an empty greeting rather than an error.
pub fn decode_greeting(body: &str) -> Result<String, GreetError> {
    let response: GreetResponse = serde_json::from_str(body)?;
    match response.greeting {
        Some(greeting) => Ok(greeting),
        None => {
            tracing::warn!("greeting response has no `greeting` field");
            Ok(String::new())
        }
    }
}

/// Build `<base>/greet/<name>`.
///
/// The name becomes a single percent-encoded path segment, so `/`, `?` and
/// spaces in it cannot change the route. A trailing slash on `base` is
/// dropped first.
pub fn greet_url(base: &Url, name: &str) -> Result<Url, ConfigError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| ConfigError::NotABase(base.to_string()))?;
        segments.pop_if_empty().push("greet").push(name);
    }
    Ok(url)
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// [`GreetingClient`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGreetingClient {
    http: Client,
    base_url: Url,
}

impl HttpGreetingClient {
    pub fn new(base_url: Url) -> Result<Self, GreetError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::NotABase(base_url.to_string()).into());
        }
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(GreetError::Transport)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl GreetingClient for HttpGreetingClient {
    fn fetch(&self, name: &str) -> Result<String, GreetError> {
        let url = greet_url(&self.base_url, name)?;
        tracing::debug!(%url, "requesting greeting");

        let response = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .map_err(GreetError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GreetError::Status(status.as_u16()));
        }

        let body = response.text().map_err(GreetError::Body)?;
        decode_greeting(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_greet_url_simple() {
        let url = greet_url(&base("http://localhost:8080"), "Alice").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/greet/Alice");
    }

    #[test]
    fn test_greet_url_keeps_base_path() {
        let url = greet_url(&base("http://localhost:8080/api"), "Alice").unwrap();
        assert_eq!(url.path(), "/api/greet/Alice");

        let url = greet_url(&base("http://localhost:8080/api/"), "Alice").unwrap();
        assert_eq!(url.path(), "/api/greet/Alice");
    }

    #[test]
    fn test_greet_url_encodes_name() {
        let url = greet_url(&base("http://h"), "Jo Ann").unwrap();
        assert_eq!(url.path(), "/greet/Jo%20Ann");

        let url = greet_url(&base("http://h"), "a/b?c#d").unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 2);
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_greet_url_drops_base_query() {
        let url = greet_url(&base("http://h/api?x=1"), "Bob").unwrap();
        assert_eq!(url.as_str(), "http://h/api/greet/Bob");
    }

    #[test]
    fn test_decode_greeting() {
        assert_eq!(decode_greeting(r#"{"greeting":"Hello, Alice"}"#).unwrap(), "Hello, Alice");
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let body = r#"{"greeting":"Hi","served_by":"api-1"}"#;
        assert_eq!(decode_greeting(body).unwrap(), "Hi");
    }

    #[test]
    fn test_decode_missing_greeting_is_empty() {
        assert_eq!(decode_greeting("{}").unwrap(), "");
        assert_eq!(decode_greeting(r#"{"greeting":null}"#).unwrap(), "");
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_greeting("<html>"), Err(GreetError::Decode(_))));
        assert!(matches!(decode_greeting(r#"{"greeting":42}"#), Err(GreetError::Decode(_))));
    }

    #[test]
    fn test_new_rejects_non_base() {
        let result = HttpGreetingClient::new(base("mailto:x@example.com"));
        assert!(matches!(result, Err(GreetError::Url(ConfigError::NotABase(_)))));
    }
}
