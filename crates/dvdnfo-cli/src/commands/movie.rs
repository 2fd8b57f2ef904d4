//! Movie command
//!
//! Update `<movies_dir>/<Name (Year)>/<Name>.nfo` from the catalog.

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Input;
use dvdnfo_core::updater::{paths, MovieFolder};
use std::path::PathBuf;

use super::context::AppContext;
use super::sync::{self, SyncTarget, SyncToggles};

/// Arguments for the movie command
#[derive(Debug, Args)]
pub struct MovieArgs {
    /// Movie folder name, e.g. "Deliverance (1972)"
    pub folder: Option<String>,

    /// Library folder holding the movie folders
    #[arg(long)]
    pub movies_dir: Option<PathBuf>,

    /// Accept all changes without prompting
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub toggles: SyncToggles,
}

/// Execute the movie command
pub fn execute(args: MovieArgs, ctx: &AppContext) -> Result<()> {
    let config = ctx.config()?;

    let folder_name = match args.folder {
        Some(folder) => folder,
        None => Input::<String>::new()
            .with_prompt("Movie folder (Name (Year))")
            .interact_text()?,
    };
    let folder = MovieFolder::parse(&folder_name).context("Invalid movie folder name")?;

    let movies_dir = args.movies_dir.unwrap_or_else(|| config.library.movies_dir.clone());
    let target = SyncTarget {
        descriptor: paths::movie_descriptor_path(&movies_dir, &folder),
        title: folder.name.clone(),
        year: Some(folder.year),
    };

    let options = args.toggles.apply(config.sync);
    sync::run(ctx, &config, target, options, args.yes)
}
