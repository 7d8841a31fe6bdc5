//! Network access to the greeting service.

pub mod client;

pub use client::{GreetingClient, HttpGreetingClient, decode_greeting, greet_url};
