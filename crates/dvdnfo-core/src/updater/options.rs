//! Which descriptor fields a sync touches

use serde::{Deserialize, Serialize};

/// One switch per merge action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SyncOptions {
    /// Download the cover image as `landscape.jpg`
    pub landscape: bool,
    pub plot: bool,
    pub outline: bool,
    /// Genres and mood tags, merged into one genre entry
    pub genre_moods: bool,
    pub best_guess_rating: bool,
    pub avg_rating: bool,
    /// Remember the catalog URL so later runs skip search
    pub netflix_tag: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            landscape: false,
            plot: true,
            outline: true,
            genre_moods: true,
            best_guess_rating: true,
            avg_rating: false,
            netflix_tag: true,
        }
    }
}

impl SyncOptions {
    /// Whether the synopsis is shown for review
    pub fn wants_synopsis(&self) -> bool {
        self.plot || self.outline
    }

    /// Whether any rating is synced
    pub fn wants_rating(&self) -> bool {
        self.best_guess_rating || self.avg_rating
    }
}
