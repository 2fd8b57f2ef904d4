//! Descriptor sync flow shared by the movie and tvshow commands

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use dvdnfo_core::config::Config;
use dvdnfo_core::session::{CatalogSession, ManualChoice};
use dvdnfo_core::types::{MovieRecord, SearchResult};
use dvdnfo_core::updater::{
    paths, plan_update, preview, DescriptorFields, FieldGroups, LookupPlan, ReviewDecision,
    SyncOptions,
};
use dvdnfo_core::DvdNfoError;
use dvdnfo_integration::download_image;
use dvdnfo_storage::NfoDocument;
use std::path::PathBuf;
use tracing::{debug, info};

use super::context::AppContext;
use super::render;

/// Per-run overrides of the `[sync]` configuration
#[derive(Debug, Default, Args)]
pub struct SyncToggles {
    /// Download the cover image as landscape.jpg
    #[arg(long, overrides_with = "no_landscape")]
    pub landscape: bool,
    #[arg(long, overrides_with = "landscape", hide = true)]
    pub no_landscape: bool,

    /// Update <plot>
    #[arg(long, overrides_with = "no_plot")]
    pub plot: bool,
    #[arg(long, overrides_with = "plot", hide = true)]
    pub no_plot: bool,

    /// Update <outline>
    #[arg(long, overrides_with = "no_outline")]
    pub outline: bool,
    #[arg(long, overrides_with = "outline", hide = true)]
    pub no_outline: bool,

    /// Merge genres and moods into <genre>
    #[arg(long, overrides_with = "no_genre_moods")]
    pub genre_moods: bool,
    #[arg(long, overrides_with = "genre_moods", hide = true)]
    pub no_genre_moods: bool,

    /// Use the personalized best-guess rating
    #[arg(long, overrides_with = "no_best_guess_rating")]
    pub best_guess_rating: bool,
    #[arg(long, overrides_with = "best_guess_rating", hide = true)]
    pub no_best_guess_rating: bool,

    /// Use the average member rating
    #[arg(long, overrides_with = "no_avg_rating")]
    pub avg_rating: bool,
    #[arg(long, overrides_with = "avg_rating", hide = true)]
    pub no_avg_rating: bool,

    /// Remember the catalog URL in <dvd-netflix-url>
    #[arg(long, overrides_with = "no_netflix_tag")]
    pub netflix_tag: bool,
    #[arg(long, overrides_with = "netflix_tag", hide = true)]
    pub no_netflix_tag: bool,
}

fn toggle(current: bool, on: bool, off: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => current,
    }
}

impl SyncToggles {
    pub fn apply(&self, base: SyncOptions) -> SyncOptions {
        SyncOptions {
            landscape: toggle(base.landscape, self.landscape, self.no_landscape),
            plot: toggle(base.plot, self.plot, self.no_plot),
            outline: toggle(base.outline, self.outline, self.no_outline),
            genre_moods: toggle(base.genre_moods, self.genre_moods, self.no_genre_moods),
            best_guess_rating: toggle(
                base.best_guess_rating,
                self.best_guess_rating,
                self.no_best_guess_rating,
            ),
            avg_rating: toggle(base.avg_rating, self.avg_rating, self.no_avg_rating),
            netflix_tag: toggle(base.netflix_tag, self.netflix_tag, self.no_netflix_tag),
        }
    }
}

/// One descriptor to update
#[derive(Debug)]
pub struct SyncTarget {
    pub descriptor: PathBuf,
    /// Title to search for when the descriptor has none
    pub title: String,
    /// Year to search with when the descriptor has none
    pub year: Option<i32>,
}

/// Look the target up, review the changes and write them
pub fn run(
    ctx: &AppContext,
    config: &Config,
    target: SyncTarget,
    options: SyncOptions,
    assume_yes: bool,
) -> Result<()> {
    let mut document = NfoDocument::open(&target.descriptor)
        .context(format!("Failed to open {}", target.descriptor.display()))?;
    let fields = document.fields()?;
    debug!("Descriptor fields: {:?}", fields);

    let mut session = ctx.open_session(config);
    if !session.is_authenticated() && options.wants_rating() {
        println!(
            "{} No usable cookies, ratings will be skipped.",
            "⚠".yellow()
        );
    }

    let Some(record) = lookup(&mut session, &fields, &target, assume_yes)? else {
        println!("Nothing selected, descriptor left unchanged.");
        return Ok(());
    };

    println!();
    render::print_record(&record, false)?;
    println!();

    let changes = preview(&fields, &record, &options);
    if changes.is_empty() {
        println!("{} Nothing to update.", "✓".green());
        return Ok(());
    }
    render::print_changes(&changes);
    println!();

    let decision = if assume_yes {
        ReviewDecision::AcceptAll
    } else {
        review(&record, &options)?
    };
    let patch = plan_update(&record, &options, decision);
    if patch.is_empty() {
        println!("Descriptor left unchanged.");
        return Ok(());
    }

    if patch.touches_descriptor() {
        document.apply(&patch)?;
        document
            .save()
            .context(format!("Failed to save {}", document.path().display()))?;
        println!("{} Updated {}", "✓".green(), document.path().display());
    }

    if let Some(image_url) = &patch.landscape_url {
        let dest = paths::landscape_path(document.path());
        let loader = ctx.loader(config);
        let pb = render::spinner("Downloading cover image...");
        let saved = download_image(&loader, image_url, &dest);
        pb.finish_and_clear();
        let bytes = saved.context(format!("Failed to download {}", image_url))?;
        info!("Cover image is {} bytes", bytes);
        println!("{} Saved {}", "✓".green(), dest.display());
    }

    Ok(())
}

fn lookup(
    session: &mut CatalogSession,
    fields: &DescriptorFields,
    target: &SyncTarget,
    assume_yes: bool,
) -> Result<Option<MovieRecord>> {
    match fields.lookup_plan(&target.title) {
        LookupPlan::Url(url) => {
            let pb = render::spinner(format!("Loading {}...", url));
            let loaded = session.load_by_url(&url);
            pb.finish_and_clear();
            loaded.context(format!("Failed to load {}", url))?;
        }
        LookupPlan::Search { title, year } => {
            let year = year.or(target.year);
            let pb = render::spinner(format!("Searching for {}...", title));
            let found = session.search(&title, year);
            pb.finish_and_clear();

            match found {
                Ok(result) => debug!("Matched {}", result),
                Err(DvdNfoError::NoMatch { candidates, .. })
                    if !candidates.is_empty() && !assume_yes =>
                {
                    println!(
                        "{} No confident match for '{}'.",
                        "⚠".yellow(),
                        title
                    );
                    let choice = choose_candidate(&candidates)?;
                    if session.select_candidate(&candidates, choice)?.is_none() {
                        return Ok(None);
                    }
                }
                Err(e) => return Err(e).context(format!("Search for '{}' failed", title)),
            }
        }
    }

    Ok(Some(session.movie_record().context("Failed to read the detail page")?))
}

fn choose_candidate(candidates: &[SearchResult]) -> Result<ManualChoice> {
    let mut items: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
    items.push("None of these".to_string());

    let picked = Select::new()
        .with_prompt("Pick the matching title")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(if picked == candidates.len() {
        ManualChoice::NoneApply
    } else {
        ManualChoice::Index(picked)
    })
}

fn review(record: &MovieRecord, options: &SyncOptions) -> Result<ReviewDecision> {
    if !console::user_attended() {
        bail!("Refusing to prompt without a terminal; pass --yes to accept all changes");
    }

    let answer: String = Input::new()
        .with_prompt("Apply these changes? [y]es / [n]o / [c]ustom")
        .default("y".to_string())
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            match input.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "n" | "no" | "c" | "custom" => Ok(()),
                _ => Err("answer y, n or c"),
            }
        })
        .interact_text()?;

    match answer.trim().to_ascii_lowercase().chars().next() {
        Some('y') => Ok(ReviewDecision::AcceptAll),
        Some('c') => {
            let has_rating = record.guess_rating.is_some() || record.avg_rating.is_some();
            let groups = FieldGroups {
                synopsis: options.wants_synopsis() && confirm("Update synopsis?")?,
                genre_moods: options.genre_moods && confirm("Update genres and moods?")?,
                rating: options.wants_rating() && has_rating && confirm("Update rating?")?,
            };
            Ok(ReviewDecision::Custom(groups))
        }
        _ => Ok(ReviewDecision::Reject),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        toggles: SyncToggles,
    }

    fn parse(args: &[&str]) -> SyncToggles {
        let mut argv = vec!["harness"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().toggles
    }

    #[test]
    fn test_no_flags_keep_config() {
        let base = SyncOptions::default();
        assert_eq!(parse(&[]).apply(base), base);
    }

    #[test]
    fn test_flags_override_config() {
        let options = parse(&["--landscape", "--no-plot", "--avg-rating"]).apply(SyncOptions::default());
        assert!(options.landscape);
        assert!(!options.plot);
        assert!(options.outline);
        assert!(options.avg_rating);
    }

    #[test]
    fn test_last_flag_wins() {
        let options = parse(&["--no-netflix-tag", "--netflix-tag"]).apply(SyncOptions::default());
        assert!(options.netflix_tag);
    }
}
