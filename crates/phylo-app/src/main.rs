// ABOUTME: Main application entry point.
// ABOUTME: Sets up logging, then hands off to the command-line dispatcher.

mod cli;
mod edit;
mod input;
mod session;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stdout carries JSON/TOML output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting phylo-builder");

    cli::run_from_env()
}
