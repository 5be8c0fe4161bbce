//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use colored::Colorize;

use crate::config::Config;
use crate::logging::Logging;

/// Run the CLI application.
///
/// Command failures are reported on stderr and do not change the exit code;
/// only setup failures (logging, config directory) are returned.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    Logging::new(cli.verbose, !cli.no_color).start()?;

    // Load configuration; a corrupt file must not block `config set-key`
    let config = Config::load_or_default()?;

    // Flag and env (handled by clap) take precedence over the config file
    let api_key = cli
        .api_key
        .filter(|k| !k.is_empty())
        .or_else(|| config.api_key.clone().filter(|k| !k.is_empty()));
    let base_url = cli.base_url.or_else(|| config.base_url.clone());

    // Create context for commands
    let ctx = commands::Context {
        api_key,
        base_url,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    // Dispatch to appropriate command
    let result = match cli.command {
        Commands::Search(args) => commands::search::execute(ctx, args).await,
        Commands::Query(args) => commands::query::execute(ctx, args).await,
        Commands::Export(args) => commands::export::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    };

    if let Err(e) = result {
        eprintln!("{} {e:#}", "Error:".red().bold());
    }

    Ok(())
}
