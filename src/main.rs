use clap::Parser;
use tracing_subscriber::EnvFilter;

mod action;
mod cli;
mod config;
mod event;
mod github;
mod policy;
mod protector;
mod repository;
mod server;

use cli::{Cli, Commands};

/// Set by GitHub Actions when a run is re-run with debug logging enabled.
const RUNNER_DEBUG_ENV: &str = "RUNNER_DEBUG";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Setup tracing subscriber
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter())),
        )
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => action::run(args).await,
        Commands::Serve(args) => server::Server::new(&args)?.start().await,
    }
}

fn default_filter() -> &'static str {
    if std::env::var(RUNNER_DEBUG_ENV).is_ok_and(|v| v == "1") {
        "branch_protector=debug,tower_http=debug"
    } else {
        "branch_protector=info,tower_http=info"
    }
}
