//! Descriptor updater
//!
//! Turns a scraped [`MovieRecord`] into a [`DescriptorPatch`] for a local
//! descriptor, after the operator has reviewed the changes. Reading and
//! writing the descriptor file itself lives in the storage crate.

mod options;
mod patch;
pub mod paths;

pub use options::SyncOptions;
pub use patch::{
    normalize_genres, plan_update, to_ten_point, DescriptorPatch, FieldGroups, RatingUpdate,
    ReviewDecision, GENRE_SEPARATOR, REDUNDANT_GENRE,
};
pub use paths::{DescriptorKind, MovieFolder};

use serde::{Deserialize, Serialize};

use crate::types::MovieRecord;

/// Fields the updater reads from an existing descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorFields {
    pub title: Option<String>,
    /// `<year>`, or the year part of `<premiered>`
    pub year: Option<i32>,
    pub plot: Option<String>,
    pub outline: Option<String>,
    pub genres: Vec<String>,
    pub rating: Option<String>,
    pub votes: Option<String>,
    /// Remembered catalog detail URL
    pub catalog_url: Option<String>,
}

/// How to find the title on the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupPlan {
    /// The descriptor already remembers its detail page
    Url(String),
    Search { title: String, year: Option<i32> },
}

impl DescriptorFields {
    /// Use the remembered URL if present, otherwise search by title and year
    pub fn lookup_plan(&self, fallback_title: &str) -> LookupPlan {
        match self.catalog_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => LookupPlan::Url(url.to_string()),
            _ => LookupPlan::Search {
                title: self
                    .title
                    .clone()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| fallback_title.to_string()),
                year: self.year,
            },
        }
    }
}

/// One line of the review shown before saving
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub before: Option<String>,
    pub after: String,
}

/// What a full acceptance would change, for operator review
pub fn preview(current: &DescriptorFields, record: &MovieRecord, options: &SyncOptions) -> Vec<FieldChange> {
    let patch = plan_update(record, options, ReviewDecision::AcceptAll);
    let mut changes = Vec::new();

    if let Some(plot) = patch.plot {
        changes.push(FieldChange {
            field: "plot",
            before: current.plot.clone(),
            after: plot,
        });
    }
    if let Some(outline) = patch.outline {
        changes.push(FieldChange {
            field: "outline",
            before: current.outline.clone(),
            after: outline,
        });
    }
    if let Some(genre) = patch.genre {
        changes.push(FieldChange {
            field: "genre",
            before: (!current.genres.is_empty()).then(|| current.genres.join(GENRE_SEPARATOR)),
            after: genre,
        });
    }
    if let Some(rating) = patch.rating {
        changes.push(FieldChange {
            field: "rating",
            before: current.rating.clone(),
            after: rating.value.to_string(),
        });
        if let Some(votes) = rating.votes {
            changes.push(FieldChange {
                field: "votes",
                before: current.votes.clone(),
                after: votes.to_string(),
            });
        }
    }
    if let Some(url) = patch.catalog_url {
        if current.catalog_url.is_none() {
            changes.push(FieldChange {
                field: "dvd-netflix-url",
                before: None,
                after: url,
            });
        }
    }
    if let Some(image) = patch.landscape_url {
        changes.push(FieldChange {
            field: paths::LANDSCAPE_FILE,
            before: None,
            after: image,
        });
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MovieRecord {
        MovieRecord {
            name: "Deliverance".to_string(),
            year: Some(1972),
            synopsis: "Four businessmen go canoeing.".to_string(),
            genres: vec!["Dramas".to_string()],
            moods: None,
            guess_rating: None,
            avg_rating: None,
            num_votes: None,
            image_url: None,
            source_url: "https://dvd.netflix.com/Movie/Deliverance/1".to_string(),
        }
    }

    #[test]
    fn test_lookup_plan_prefers_url() {
        let fields = DescriptorFields {
            title: Some("Deliverance".to_string()),
            year: Some(1972),
            catalog_url: Some(" https://dvd.netflix.com/Movie/Deliverance/1 ".to_string()),
            ..DescriptorFields::default()
        };
        assert_eq!(
            fields.lookup_plan("ignored"),
            LookupPlan::Url("https://dvd.netflix.com/Movie/Deliverance/1".to_string())
        );
    }

    #[test]
    fn test_lookup_plan_falls_back_to_search() {
        let fields = DescriptorFields {
            year: Some(2017),
            catalog_url: Some(String::new()),
            ..DescriptorFields::default()
        };
        assert_eq!(
            fields.lookup_plan("Blood Drive"),
            LookupPlan::Search {
                title: "Blood Drive".to_string(),
                year: Some(2017)
            }
        );
    }

    #[test]
    fn test_preview_lists_changes() {
        let current = DescriptorFields {
            plot: Some("Old plot".to_string()),
            genres: vec!["Drama".to_string(), "Thriller".to_string()],
            ..DescriptorFields::default()
        };
        let changes = preview(&current, &record(), &SyncOptions::default());
        let fields: Vec<&str> = changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["plot", "outline", "genre", "dvd-netflix-url"]);
        assert_eq!(changes[0].before.as_deref(), Some("Old plot"));
        assert_eq!(changes[2].before.as_deref(), Some("Drama / Thriller"));
    }

    #[test]
    fn test_preview_skips_known_url() {
        let current = DescriptorFields {
            catalog_url: Some("https://dvd.netflix.com/Movie/Deliverance/1".to_string()),
            ..DescriptorFields::default()
        };
        let changes = preview(&current, &record(), &SyncOptions::default());
        assert!(changes.iter().all(|c| c.field != "dvd-netflix-url"));
    }
}
