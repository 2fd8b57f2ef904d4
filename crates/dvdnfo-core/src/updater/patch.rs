//! Planning the changes a sync makes to a descriptor

use serde::{Deserialize, Serialize};

use super::options::SyncOptions;
use crate::types::MovieRecord;

/// Genre the catalog puts on every show, which says nothing in a TV library
pub const REDUNDANT_GENRE: &str = "TV Shows";

/// Separator the descriptor format uses inside one genre entry
pub const GENRE_SEPARATOR: &str = " / ";

/// Field groups confirmed one by one in a custom review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldGroups {
    pub synopsis: bool,
    pub genre_moods: bool,
    pub rating: bool,
}

/// Operator decision after reviewing scraped fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Apply everything the sync options select
    AcceptAll,
    /// Apply only the confirmed groups
    Custom(FieldGroups),
    /// Leave the descriptor untouched
    Reject,
}

/// New rating on the descriptor's 10-point scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub value: f64,
    pub votes: Option<u64>,
}

/// Field values to write into a descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorPatch {
    pub plot: Option<String>,
    pub outline: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<RatingUpdate>,
    /// Written only when the descriptor has no catalog URL yet
    pub catalog_url: Option<String>,
    /// Cover image to store next to the descriptor
    pub landscape_url: Option<String>,
}

impl DescriptorPatch {
    /// Whether the patch changes the descriptor file itself
    pub fn touches_descriptor(&self) -> bool {
        self.plot.is_some()
            || self.outline.is_some()
            || self.genre.is_some()
            || self.rating.is_some()
            || self.catalog_url.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.touches_descriptor() && self.landscape_url.is_none()
    }
}

/// Build the patch for a record under the operator's decision
pub fn plan_update(record: &MovieRecord, options: &SyncOptions, decision: ReviewDecision) -> DescriptorPatch {
    let mut patch = DescriptorPatch::default();

    match decision {
        ReviewDecision::Reject => {}
        ReviewDecision::AcceptAll => {
            if options.plot {
                patch.plot = Some(record.synopsis.clone());
            }
            if options.outline {
                patch.outline = Some(record.synopsis.clone());
            }
            if options.genre_moods {
                patch.genre = Some(normalize_genres(&record.genres, record.moods.as_deref()));
            }
            if options.best_guess_rating {
                patch.rating = rating_update(record.guess_rating, record.num_votes).or(patch.rating);
            }
            if options.avg_rating {
                patch.rating = rating_update(record.avg_rating, record.num_votes).or(patch.rating);
            }
            if options.landscape {
                patch.landscape_url = record.image_url.clone();
            }
            if options.netflix_tag {
                patch.catalog_url = Some(record.source_url.clone());
            }
        }
        ReviewDecision::Custom(groups) => {
            if groups.synopsis {
                patch.plot = Some(record.synopsis.clone());
                patch.outline = Some(record.synopsis.clone());
            }
            if groups.genre_moods {
                patch.genre = Some(normalize_genres(&record.genres, record.moods.as_deref()));
            }
            if groups.rating {
                let rating = if options.avg_rating && !options.best_guess_rating {
                    record.avg_rating
                } else {
                    record.guess_rating
                };
                patch.rating = rating_update(rating, record.num_votes);
            }
        }
    }

    patch
}

fn rating_update(stars: Option<f64>, votes: Option<u64>) -> Option<RatingUpdate> {
    stars.map(|stars| RatingUpdate {
        value: to_ten_point(stars),
        votes,
    })
}

/// Catalog ratings are out of 5 stars, descriptors out of 10
pub fn to_ten_point(stars: f64) -> f64 {
    (stars * 20.0).round() / 10.0
}

/// One genre entry: genres then moods, `/` inside names replaced by ` & `,
/// the redundant TV category dropped
pub fn normalize_genres(genres: &[String], moods: Option<&[String]>) -> String {
    let clean = |name: &String| name.trim().replace('/', " & ");

    let mut parts: Vec<String> = genres
        .iter()
        .filter(|g| g.trim() != REDUNDANT_GENRE)
        .map(clean)
        .collect();
    if let Some(moods) = moods {
        parts.extend(moods.iter().map(clean));
    }
    parts.retain(|p| !p.is_empty());
    parts.join(GENRE_SEPARATOR)
}
