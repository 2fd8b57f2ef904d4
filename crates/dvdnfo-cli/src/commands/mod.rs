//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod config;
pub mod context;
pub mod cookies;
pub mod movie;
pub mod render;
pub mod search;
pub mod show;
pub mod sync;
pub mod tvshow;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use context::AppContext;

/// dvdnfo - DVD catalog metadata scraper for Kodi descriptors
#[derive(Debug, Parser)]
#[command(name = "dvdnfo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DVDNFO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Cookie export file for a signed-in session
    #[arg(long, global = true, env = "DVDNFO_COOKIES")]
    pub cookies: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search the catalog and print the matched title
    Search(search::SearchArgs),

    /// Load a detail page by URL and print it
    Show(show::ShowArgs),

    /// Update a movie descriptor from the catalog
    Movie(movie::MovieArgs),

    /// Update a TV show descriptor from the catalog
    #[command(name = "tvshow")]
    TvShow(tvshow::TvShowArgs),

    /// Inspect the cookie file
    #[command(subcommand)]
    Cookies(cookies::CookiesCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = AppContext::new(cli.config.as_deref(), cli.cookies);

    // Dispatch to command handler
    match cli.command {
        Commands::Search(args) => search::execute(args, &ctx),
        Commands::Show(args) => show::execute(args, &ctx),
        Commands::Movie(args) => movie::execute(args, &ctx),
        Commands::TvShow(args) => tvshow::execute(args, &ctx),
        Commands::Cookies(cmd) => cookies::execute(cmd, &ctx),
        Commands::Config(cmd) => config::execute(cmd, &ctx),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dvdnfo",
            "search",
            "Deliverance",
            "--year",
            "1972",
            "-vv",
            "--cookies",
            "/tmp/cookies.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.cookies, Some(PathBuf::from("/tmp/cookies.json")));
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.title, "Deliverance");
                assert_eq!(args.year, Some(1972));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
