//! dryai - command line access to dry.ai workspaces.
//!
//! Spaces and items are created, searched and changed with plain-language
//! queries. The first command that needs a token walks through email
//! verification once and stores the token in `.env`.

mod cli;
mod commands;
mod state;

use std::io;

use anyhow::Result;
use clap::Parser;
use drydotai::{ClientConfig, ConsolePrompt, Session};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Command};
use state::TrackerState;

/// Initialize the tracing subscriber for logging
fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise show library messages and warnings
    let default_filter = if verbose { "info" } else { "warn,drydotai=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .with(filter)
        .init();
}

/// Environment config with command line flags layered on top
fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(server) = cli.server.as_ref().filter(|s| !s.trim().is_empty()) {
        config = config.with_server(server.clone());
    }
    if let Some(token) = cli.token.as_ref().filter(|t| !t.is_empty()) {
        config = config.with_token(token.clone());
    }
    if cli.verbose {
        config = config.with_verbose(true);
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = client_config(&cli);

    init_tracing(config.verbose);
    info!(server = %config.server, "dryai starting");

    let session = Session::new(config).with_prompt(ConsolePrompt);

    match cli.command {
        Command::Auth(command) => commands::auth::run(&session, command).await,
        Command::Space(command) => commands::space::run(&session, command).await,
        Command::Item(command) => commands::item::run(&session, command).await,
        Command::Tracker(command) => {
            let state_path = TrackerState::default_path()?;
            debug!(path = %state_path.display(), "Tracker state location");
            commands::tracker::run(&session, &state_path, command).await
        }
    }
}
