//! dvdnfo - DVD catalog metadata scraper
//!
//! Looks titles up on the DVD rental catalog and merges synopsis, genres,
//! moods and ratings into Kodi `.nfo` descriptors.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default configuration
//! dvdnfo config init
//!
//! # Look a title up
//! dvdnfo search "Alice in Wonderland" --year 2010
//!
//! # Update a movie descriptor
//! dvdnfo movie "Deliverance (1972)"
//!
//! # Update a TV show descriptor, cover image included
//! dvdnfo tvshow "Blood Drive" --landscape
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
