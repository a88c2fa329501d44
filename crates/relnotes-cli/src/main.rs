//! relnotes
//!
//! Parse, validate, and extend release-note changelogs.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use relnotes_cli::{Cli, Context, Outcome, RelnotesConfig, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = RelnotesConfig::load_with_env(cli.config.as_deref())?;

    // RUST_LOG wins; otherwise the configured level, raised by -v.
    let level = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .init();

    tracing::debug!(command = ?cli.command, "relnotes starting");

    let ctx = Context {
        config_path: cli.config,
        config,
        file: cli.file,
    };
    let mut stdout = std::io::stdout().lock();
    match run(cli.command, &ctx, &mut stdout).await {
        Ok(Outcome::Success) => Ok(ExitCode::SUCCESS),
        Ok(Outcome::Failure) => Ok(ExitCode::FAILURE),
        Err(e) => {
            tracing::error!("{e}");
            Err(e.into())
        }
    }
}
