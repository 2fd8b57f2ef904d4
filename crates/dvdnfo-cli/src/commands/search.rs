//! Search command
//!
//! Look a title up and print what the catalog has for it.

use anyhow::{Context, Result};
use clap::Args;
use dvdnfo_core::DvdNfoError;

use super::context::AppContext;
use super::render;

/// Arguments for the search command
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Title to search for
    pub title: String,

    /// Release year, used to tell remakes apart
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the search command
pub fn execute(args: SearchArgs, ctx: &AppContext) -> Result<()> {
    let config = ctx.config()?;
    let mut session = ctx.open_session(&config);

    let pb = render::spinner(format!("Searching for {}...", args.title));
    let found = session.search(&args.title, args.year);
    pb.finish_and_clear();

    if let Err(DvdNfoError::NoMatch { candidates, .. }) = &found {
        if !args.json && !candidates.is_empty() {
            render::print_candidates(candidates);
        }
    }
    found.context(format!("Search for '{}' failed", args.title))?;

    let record = session.movie_record().context("Failed to read the detail page")?;
    render::print_record(&record, args.json)
}
