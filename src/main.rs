//! `greeter` - type a name, get a greeting.
//!
//! ```text
//! greeter --api-url http://localhost:8080/api          # interactive
//! greeter --api-url http://localhost:8080/api Alice    # one-shot
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use spark_greeter::config::{Cli, Config};
use spark_greeter::logging::{self, LogTarget};
use spark_greeter::net::{GreetingClient, HttpGreetingClient};
use spark_greeter::pipeline::mount;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    let interactive = cli.name.is_none();
    logging::init(LogTarget::for_mode(config.log_file.as_deref(), interactive))?;

    let client = HttpGreetingClient::new(config.base_url.clone())
        .context("build greeting client")?;
    tracing::info!(base_url = %config.base_url, "greeting service configured");

    match cli.name {
        Some(name) => greet_once(&client, &name),
        None => run_interactive(Arc::new(client)),
    }
}

/// Fetch one greeting and print it.
fn greet_once(client: &HttpGreetingClient, name: &str) -> Result<()> {
    let greeting = client
        .fetch(name)
        .with_context(|| format!("failed to load greeting for {:?}", name))?;
    println!("{}", greeting);
    Ok(())
}

fn run_interactive(client: Arc<dyn GreetingClient>) -> Result<()> {
    let handle = mount::mount(client).context("set up terminal")?;
    let result = mount::run(&handle);
    handle.unmount();
    result.context("event loop")
}
