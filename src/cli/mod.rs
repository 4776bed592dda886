use std::{net::Ipv4Addr, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::ProtectionInputs;

#[derive(Parser)]
#[command(version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Handle the event of the current GitHub Actions run, then exit
    Run(RunArgs),
    /// Receive create/delete webhooks and handle each delivery
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Name of the event that triggered the workflow
    #[arg(long, env("GITHUB_EVENT_NAME"))]
    pub event_name: String,
    /// Path to the JSON payload of the triggering event
    #[arg(
        long,
        env("GITHUB_EVENT_PATH"),
        value_name = "PATH",
        value_hint = clap::ValueHint::FilePath
    )]
    pub event_path: PathBuf,
    /// GitHub API root, for GitHub Enterprise Server
    #[arg(long, env("GITHUB_API_URL"))]
    pub api_url: Option<String>,
    #[command(flatten)]
    pub inputs: ProtectionInputs,
}

#[derive(Args)]
pub struct ServeArgs {
    /// The server address to bind to
    #[arg(short, long, default_value = "0.0.0.0", env("SERVER_ADDRESS"))]
    pub address: Ipv4Addr,
    /// The port to run the server on
    #[arg(short, long, default_value = "8080", env("SERVER_PORT"))]
    pub port: u16,
    /// Secret used to sign webhook deliveries
    #[arg(long, env("GITHUB_WEBHOOK_SECRET"), hide_env_values = true)]
    pub webhook_secret: String,
    /// GitHub API root, for GitHub Enterprise Server
    #[arg(long, env("GITHUB_API_URL"))]
    pub api_url: Option<String>,
    #[command(flatten)]
    pub inputs: ProtectionInputs,
}
