//! Greeter - name in, greeting out.
//!
//! Owns the two pieces of reactive state the screen shows:
//! - `name` signal (what is typed in the input)
//! - `greeting` signal (what the server said about that name)
//!
//! One effect watches `name`. Every committed change either clears the
//! greeting (empty name) or dispatches a request tagged with the name it was
//! issued for. Requests run on worker threads and report back over a channel;
//! the UI thread applies each [`Resolution`] only if its tag still equals the
//! live name. In-flight requests are never cancelled, so slow responses for
//! superseded names are simply dropped when they land.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use spark_greeter::state::greeting::Greeter;
//!
//! let greeter = Greeter::new(Arc::new(client));
//! greeter.set_name("Alice");
//! greeter.wait_resolution(Duration::from_secs(5));
//! assert_eq!(greeter.greeting().greeting(), Some("Hello, Alice"));
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use spark_signals::{Signal, effect, signal};

use crate::error::GreetError;
use crate::net::GreetingClient;
use crate::types::GreetingState;

// =============================================================================
// RESOLUTION
// =============================================================================

/// A finished request on its way back to the UI thread.
#[derive(Debug)]
pub struct Resolution {
    /// The name the request was issued for.
    pub token: String,
    pub result: Result<String, GreetError>,
}

impl Resolution {
    /// Whether this resolution still belongs on screen for `live_name`.
    pub fn is_current(&self, live_name: &str) -> bool {
        self.token == live_name
    }
}

// =============================================================================
// GREETER
// =============================================================================

/// The greeting component's state and its request effect.
pub struct Greeter {
    name: Signal<String>,
    greeting: Signal<GreetingState>,
    resolutions: Receiver<Resolution>,
    dispatched: Rc<Cell<u64>>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl Greeter {
    /// Create the state and install the request effect.
    ///
    /// The effect runs once immediately with an empty name, which issues
    /// nothing.
    pub fn new(client: Arc<dyn GreetingClient>) -> Self {
        let (tx, rx) = mpsc::channel();

        let name = signal(String::new());
        let greeting = signal(GreetingState::Idle);
        let dispatched = Rc::new(Cell::new(0u64));

        let name_for_effect = name.clone();
        let greeting_for_effect = greeting.clone();
        let dispatched_for_effect = dispatched.clone();

        let stop = effect(move || {
            // Only dependency: the name
            let current = name_for_effect.get();

            if current.is_empty() {
                greeting_for_effect.set(GreetingState::Idle);
                return;
            }

            // Withdraw whatever was shown for the previous name
            greeting_for_effect.set(GreetingState::Pending);
            dispatched_for_effect.set(dispatched_for_effect.get() + 1);
            dispatch(client.clone(), current, tx.clone());
        });

        Self {
            name,
            greeting,
            resolutions: rx,
            dispatched,
            stop_effect: Some(Box::new(stop)),
        }
    }

    /// Replace the name. Writing the same value again triggers nothing.
    pub fn set_name(&self, name: impl Into<String>) {
        self.name.set(name.into());
    }

    pub fn name(&self) -> String {
        self.name.get()
    }

    pub fn greeting(&self) -> GreetingState {
        self.greeting.get()
    }

    /// The name signal, for binding an input to.
    pub fn name_signal(&self) -> Signal<String> {
        self.name.clone()
    }

    /// The greeting signal, for the render pipeline.
    pub fn greeting_signal(&self) -> Signal<GreetingState> {
        self.greeting.clone()
    }

    /// Number of requests issued so far.
    pub fn requests_dispatched(&self) -> u64 {
        self.dispatched.get()
    }

    /// Apply a resolution if it is still current.
    ///
    /// Returns true if the greeting changed hands, false if the resolution
    /// was stale and discarded.
    pub fn apply(&self, resolution: Resolution) -> bool {
        let live = self.name.get();
        if !resolution.is_current(&live) {
            tracing::debug!(
                token = %resolution.token,
                live = %live,
                "discarding stale greeting response"
            );
            return false;
        }

        match resolution.result {
            Ok(text) => {
                tracing::debug!(name = %live, "greeting received");
                self.greeting.set(GreetingState::Ready(text));
            }
            Err(err) => {
                tracing::warn!(name = %live, error = %err, "failed to load greeting");
                self.greeting.set(GreetingState::Failed(err.to_string()));
            }
        }
        true
    }

    /// Apply every resolution that has already arrived. Never blocks.
    ///
    /// Returns how many were applied (stale ones are not counted).
    pub fn poll_resolutions(&self) -> usize {
        let mut applied = 0;
        loop {
            match self.resolutions.try_recv() {
                Ok(resolution) => {
                    if self.apply(resolution) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Wait up to `timeout` for one resolution and apply it.
    ///
    /// Returns `None` on timeout, otherwise whether it was applied.
    pub fn wait_resolution(&self, timeout: Duration) -> Option<bool> {
        match self.resolutions.recv_timeout(timeout) {
            Ok(resolution) => Some(self.apply(resolution)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Greeter {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Run one request on its own worker thread.
fn dispatch(client: Arc<dyn GreetingClient>, token: String, tx: Sender<Resolution>) {
    tracing::debug!(name = %token, "dispatching greeting request");

    let worker_tx = tx.clone();
    let worker_token = token.clone();
    let spawned = thread::Builder::new()
        .name("greet-request".to_string())
        .spawn(move || {
            let result = client.fetch(&worker_token);
            // Receiver gone means the greeter was dropped; nothing to tell.
            let _ = worker_tx.send(Resolution {
                token: worker_token,
                result,
            });
        });

    if let Err(err) = spawned {
        let _ = tx.send(Resolution {
            token,
            result: Err(GreetError::Spawn(err)),
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    /// Answers immediately with "Hello, <name>" and records every call.
    struct EchoClient {
        calls: Mutex<Vec<String>>,
    }

    impl EchoClient {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl GreetingClient for EchoClient {
        fn fetch(&self, name: &str) -> Result<String, GreetError> {
            self.calls.lock().unwrap().push(name.to_string());
            Ok(format!("Hello, {}", name))
        }
    }

    /// Always fails with a status error.
    struct DownClient;

    impl GreetingClient for DownClient {
        fn fetch(&self, _name: &str) -> Result<String, GreetError> {
            Err(GreetError::Status(502))
        }
    }

    #[test]
    fn test_initial_state_issues_nothing() {
        let client = EchoClient::new();
        let greeter = Greeter::new(client.clone());

        assert_eq!(greeter.name(), "");
        assert_eq!(greeter.greeting(), GreetingState::Idle);
        assert_eq!(greeter.requests_dispatched(), 0);
        assert_eq!(greeter.wait_resolution(Duration::from_millis(50)), None);
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_alice_scenario() {
        let client = EchoClient::new();
        let greeter = Greeter::new(client.clone());

        greeter.set_name("Alice");
        assert_eq!(greeter.greeting(), GreetingState::Pending);

        assert_eq!(greeter.wait_resolution(WAIT), Some(true));
        assert_eq!(greeter.greeting().greeting(), Some("Hello, Alice"));
        assert_eq!(client.calls(), vec!["Alice".to_string()]);
    }

    #[test]
    fn test_one_request_per_distinct_name() {
        let client = EchoClient::new();
        let greeter = Greeter::new(client.clone());

        greeter.set_name("A");
        greeter.set_name("A");
        greeter.set_name("Al");
        assert_eq!(greeter.requests_dispatched(), 2);

        greeter.wait_resolution(WAIT);
        greeter.wait_resolution(WAIT);
        let mut calls = client.calls();
        calls.sort();
        assert_eq!(calls, vec!["A".to_string(), "Al".to_string()]);
    }

    #[test]
    fn test_empty_name_clears_without_request() {
        let client = EchoClient::new();
        let greeter = Greeter::new(client.clone());

        greeter.set_name("Bob");
        greeter.wait_resolution(WAIT);
        assert!(greeter.greeting().greeting().is_some());

        greeter.set_name("");
        assert_eq!(greeter.greeting(), GreetingState::Idle);
        assert_eq!(greeter.requests_dispatched(), 1);
    }

    #[test]
    fn test_stale_resolution_discarded() {
        let greeter = Greeter::new(EchoClient::new());
        greeter.set_name("Carol");

        let applied = greeter.apply(Resolution {
            token: "Caro".to_string(),
            result: Ok("Hello, Caro".to_string()),
        });

        assert!(!applied);
        assert_ne!(greeter.greeting().greeting(), Some("Hello, Caro"));
    }

    #[test]
    fn test_failure_is_distinguishable() {
        let greeter = Greeter::new(Arc::new(DownClient));
        greeter.set_name("Dave");

        assert_eq!(greeter.wait_resolution(WAIT), Some(true));
        let state = greeter.greeting();
        assert!(state.is_failed());
        assert_eq!(state.greeting(), None);
    }

    #[test]
    fn test_poll_resolutions_drains() {
        let greeter = Greeter::new(EchoClient::new());
        greeter.set_name("Eve");

        // Give the worker a moment, then drain without blocking
        let mut applied = 0;
        for _ in 0..100 {
            applied += greeter.poll_resolutions();
            if applied > 0 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(applied, 1);
        assert_eq!(greeter.greeting().greeting(), Some("Hello, Eve"));
    }
}
