//! `rapiddns config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::SetKey { key } => set_key(&key),
        ConfigCommands::GetKey => get_key(&ctx),
        ConfigCommands::Path => show_path(),
    }
}

fn set_key(key: &str) -> Result<()> {
    let mut config = Config::load_or_default()?;
    config.api_key = Some(key.trim().to_string());
    config.save()?;

    println!("{} API key set successfully.", "Success:".green().bold());
    Ok(())
}

fn get_key(ctx: &Context) -> Result<()> {
    match &ctx.api_key {
        Some(key) => println!("Current API key: {key}"),
        None => println!("API key is not set."),
    }
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
