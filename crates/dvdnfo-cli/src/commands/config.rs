//! Config command
//!
//! Manage dvdnfo configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use super::context::AppContext;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration
    Init {
        /// Overwrite without keeping a backup
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(ctx, json),
        ConfigCommand::Init { force } => init_config(ctx, force),
        ConfigCommand::Path => {
            println!("{}", ctx.store().path().display());
            Ok(())
        }
    }
}

fn show_config(ctx: &AppContext, as_json: bool) -> Result<()> {
    let config = ctx.config()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if ctx.store().exists() {
        println!("{}", ctx.store().path().display().to_string().dimmed());
    } else {
        println!(
            "{} {}",
            "(defaults, no file at".dimmed(),
            format!("{})", ctx.store().path().display()).dimmed()
        );
    }
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}

fn init_config(ctx: &AppContext, force: bool) -> Result<()> {
    let store = ctx.store();
    let backup = store
        .init(force)
        .context(format!("Failed to write {}", store.path().display()))?;

    if let Some(backup) = backup {
        println!("{} Backed up to {}", "✓".green(), backup.display());
    }
    println!(
        "{} Wrote default configuration to {}",
        "✓".green(),
        store.path().display()
    );

    Ok(())
}
