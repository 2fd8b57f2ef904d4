//! Show command

use anyhow::{Context, Result};
use clap::Args;

use super::context::AppContext;
use super::render;

/// Arguments for the show command
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Detail page URL, absolute or relative to the catalog
    pub url: String,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the show command
pub fn execute(args: ShowArgs, ctx: &AppContext) -> Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config);

    let pb = render::spinner(format!("Loading {}...", args.url));
    let loaded = session.load_by_url(&args.url);
    pb.finish_and_clear();
    loaded.context(format!("Failed to load {}", args.url))?;

    let record = session.movie_record().context("Failed to read the detail page")?;
    render::print_record(&record, args.json)
}
