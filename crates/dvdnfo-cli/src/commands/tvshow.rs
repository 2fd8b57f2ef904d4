//! TV show command
//!
//! Update `<tvshows_dir>/<Name>/tvshow.nfo` from the catalog.

use anyhow::{bail, Result};
use clap::Args;
use dialoguer::Input;
use dvdnfo_core::updater::paths;
use std::path::PathBuf;

use super::context::AppContext;
use super::sync::{self, SyncTarget, SyncToggles};

/// Arguments for the tvshow command
#[derive(Debug, Args)]
pub struct TvShowArgs {
    /// Show folder name, e.g. "Blood Drive"
    pub name: Option<String>,

    /// Library folder holding the show folders
    #[arg(long)]
    pub tv_dir: Option<PathBuf>,

    /// Accept all changes without prompting
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub toggles: SyncToggles,
}

/// Execute the tvshow command
pub fn execute(args: TvShowArgs, ctx: &AppContext) -> Result<()> {
    let config = ctx.config()?;

    let name = match args.name {
        Some(name) => name,
        None => Input::<String>::new().with_prompt("TV show").interact_text()?,
    };
    let name = name.trim().to_string();
    if name.is_empty() {
        bail!("TV show name must not be empty");
    }

    let tv_dir = args.tv_dir.unwrap_or_else(|| config.library.tvshows_dir.clone());
    // Year comes from <premiered> when the descriptor has one
    let target = SyncTarget {
        descriptor: paths::tvshow_descriptor_path(&tv_dir, &name),
        title: name,
        year: None,
    };

    let options = args.toggles.apply(config.sync);
    sync::run(ctx, &config, target, options, args.yes)
}
