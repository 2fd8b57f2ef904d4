//! Console output shared by commands

use anyhow::Result;
use colored::Colorize;
use dvdnfo_core::types::{MovieRecord, SearchResult};
use dvdnfo_core::updater::{FieldChange, GENRE_SEPARATOR};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr while the catalog is queried
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_record(record: &MovieRecord, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    let heading = match record.year {
        Some(year) => format!("{} ({})", record.name, year),
        None => record.name.clone(),
    };
    println!("{}", heading.bold().underline());
    println!("{}", record.source_url.dimmed());
    println!();
    println!("{}", record.synopsis);
    println!();
    println!("{:>10} {}", "Genres:".cyan(), record.genres.join(GENRE_SEPARATOR));
    if let Some(moods) = &record.moods {
        println!("{:>10} {}", "Moods:".cyan(), moods.join(GENRE_SEPARATOR));
    }
    match (record.guess_rating, record.avg_rating) {
        (None, None) => println!("{:>10} {}", "Rating:".cyan(), "sign in to see ratings".dimmed()),
        (guess, avg) => {
            let show = |r: Option<f64>| r.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string());
            println!(
                "{:>10} best guess {} / average {}",
                "Rating:".cyan(),
                show(guess),
                show(avg)
            );
        }
    }
    if let Some(votes) = record.num_votes {
        println!("{:>10} {}", "Votes:".cyan(), votes);
    }
    if let Some(image) = &record.image_url {
        println!("{:>10} {}", "Cover:".cyan(), image);
    }

    Ok(())
}

pub fn print_candidates(candidates: &[SearchResult]) {
    println!("{}", "Candidates:".bold());
    for (i, candidate) in candidates.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, candidate);
        println!("      {}", candidate.detail_url.dimmed());
    }
}

pub fn print_changes(changes: &[FieldChange]) {
    for change in changes {
        println!("{}", change.field.cyan().bold());
        match &change.before {
            Some(before) => println!("  {} {}", "-".red(), before.red()),
            None => println!("  {} {}", "-".red(), "(none)".dimmed()),
        }
        println!("  {} {}", "+".green(), change.after.green());
    }
}
