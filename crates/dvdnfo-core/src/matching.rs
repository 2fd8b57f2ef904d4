//! Candidate matching for catalog searches

use serde::{Deserialize, Serialize};

use crate::types::{SearchQuery, SearchResult};

/// Default minimum similarity (0 to 100) for a candidate to be accepted
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Default exclusive bound on the year difference
pub const DEFAULT_YEAR_TOLERANCE: i32 = 2;

/// How to choose among candidates that pass the filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// First passing candidate in document order, keeping the site's ranking
    #[default]
    FirstMatch,
    /// Highest similarity among passing candidates, earliest on ties
    BestMatch,
}

/// Filters applied to each candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCriteria {
    pub threshold: u8,
    pub year_tolerance: i32,
    pub policy: MatchPolicy,
}

impl Default for MatchCriteria {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            year_tolerance: DEFAULT_YEAR_TOLERANCE,
            policy: MatchPolicy::FirstMatch,
        }
    }
}

/// A candidate that passed the filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub index: usize,
    pub score: u8,
    pub candidate: &'a SearchResult,
}

impl MatchCriteria {
    /// Score a candidate, or `None` if it fails a filter
    pub fn evaluate(&self, query: &SearchQuery, candidate: &SearchResult) -> Option<u8> {
        let score = similarity(&query.normalized_title(), &candidate.display_name.to_lowercase());
        if score < self.threshold {
            return None;
        }
        if let Some(year) = query.year {
            let candidate_year = candidate.year?;
            if (candidate_year - year).abs() >= self.year_tolerance {
                return None;
            }
        }
        Some(score)
    }

    /// Pick a candidate according to the policy
    pub fn select<'a>(&self, query: &SearchQuery, candidates: &'a [SearchResult]) -> Option<Match<'a>> {
        let mut passing = candidates.iter().enumerate().filter_map(|(index, candidate)| {
            self.evaluate(query, candidate).map(|score| Match {
                index,
                score,
                candidate,
            })
        });

        match self.policy {
            MatchPolicy::FirstMatch => passing.next(),
            MatchPolicy::BestMatch => passing.fold(None, |best: Option<Match<'a>>, m| match best {
                Some(b) if b.score >= m.score => Some(b),
                _ => Some(m),
            }),
        }
    }
}

/// Similarity ratio between two strings on a 0 to 100 scale.
///
/// Normalized indel similarity from `rapidfuzz`, rounded to the nearest
/// integer. Either side empty scores 0.
pub fn similarity(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let ratio = rapidfuzz::fuzz::ratio(a.chars(), b.chars());
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("Alice in Wonderland", Some(1951), "/Movie/Alice/1951"),
            SearchResult::new("Alice Through the Looking Glass", Some(2016), "/Movie/Alice/2016"),
            SearchResult::new("Alice in Wonderland", Some(2010), "/Movie/Alice/2010"),
        ]
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("deliverance", "deliverance"), 100);
        assert_eq!(similarity("abc", "xyz"), 0);
        assert_eq!(similarity("", "abc"), 0);
    }

    #[test]
    fn test_similarity_known_values() {
        // 2 * 14 / (14 + 15)
        assert_eq!(similarity("this is a test", "this is a test!"), 97);
        // 2 * 8 / (11 + 13)
        assert_eq!(similarity("blood drive", "blood diamond"), 67);
        // 2 * 11 / (15 + 11)
        assert_eq!(similarity("the deliverance", "deliverance"), 85);
    }

    #[test]
    fn test_similarity_counts_chars_not_bytes() {
        assert_eq!(similarity("amélie", "amélie"), 100);
        assert_eq!(similarity("amélie", "amelie"), 83);
    }

    #[test]
    fn test_year_selects_remake() {
        let criteria = MatchCriteria::default();
        let results = alice_results();

        let found = criteria
            .select(&SearchQuery::new("Alice in Wonderland", Some(2010)), &results)
            .unwrap();
        assert_eq!(found.candidate.detail_url, "/Movie/Alice/2010");

        let found = criteria
            .select(&SearchQuery::new("Alice in Wonderland", Some(1950)), &results)
            .unwrap();
        assert_eq!(found.candidate.detail_url, "/Movie/Alice/1951");
    }

    #[test]
    fn test_year_tolerance_is_exclusive() {
        let criteria = MatchCriteria::default();
        let results = alice_results();
        assert!(criteria
            .select(&SearchQuery::new("Alice in Wonderland", Some(1953)), &results)
            .is_none());
    }

    #[test]
    fn test_first_match_keeps_document_order() {
        let results = vec![
            SearchResult::new("The Deliverance", Some(2014), "/a"),
            SearchResult::new("Deliverance", Some(1972), "/b"),
        ];
        let query = SearchQuery::new("deliverance", None);

        let first = MatchCriteria::default().select(&query, &results).unwrap();
        assert_eq!(first.index, 0);
        assert!(first.score < 100);

        let best = MatchCriteria {
            policy: MatchPolicy::BestMatch,
            ..MatchCriteria::default()
        }
        .select(&query, &results)
        .unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_missing_year_fails_year_filter() {
        let results = vec![SearchResult::new("Deliverance", None, "/b")];
        let criteria = MatchCriteria::default();
        assert!(criteria
            .select(&SearchQuery::new("Deliverance", Some(1972)), &results)
            .is_none());
        assert!(criteria
            .select(&SearchQuery::new("Deliverance", None), &results)
            .is_some());
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&MatchPolicy::BestMatch).unwrap();
        assert_eq!(json, "\"best-match\"");
    }
}
