//! Error types for dvdnfo

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::types::SearchResult;

/// Main error type for dvdnfo
#[derive(Debug, Error)]
pub enum DvdNfoError {
    /// Search results container never rendered within the wait bound
    #[error("Search results did not load within {}s", .0.as_secs_f32())]
    SearchTimeout(Duration),

    /// No search candidate passed the match policy
    #[error("No matching titles were found for '{query}' ({} candidates)", .candidates.len())]
    NoMatch {
        query: String,
        candidates: Vec<SearchResult>,
    },

    /// Detail page is missing its expected structure
    #[error("Page load failed for {url}: {message}")]
    PageLoad { url: String, message: String },

    /// Field accessor called before any successful load
    #[error("No detail page loaded; call search or load_by_url first")]
    NoPageLoaded,

    /// Required field missing from an otherwise loaded page
    #[error("Could not extract {field}: {message}")]
    Extraction {
        field: &'static str,
        message: String,
    },

    /// Manual candidate selection out of range
    #[error("Invalid selection {index}: only {available} candidates")]
    InvalidSelection { index: usize, available: usize },

    /// HTTP transport or status error
    #[error("HTTP error for {url}: {message}")]
    Http { url: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// XML read or write error
    #[error("XML error: {0}")]
    Xml(String),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Descriptor file is missing or malformed
    #[error("Invalid descriptor {path}: {message}")]
    InvalidDescriptor { path: PathBuf, message: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DvdNfoError>,
    },
}

impl DvdNfoError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DvdNfoError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for an extraction failure
    pub fn extraction(field: &'static str, message: impl Into<String>) -> Self {
        DvdNfoError::Extraction {
            field,
            message: message.into(),
        }
    }

    /// Candidates attached to a `NoMatch`, looking through context wrappers
    pub fn candidates(&self) -> Option<&[SearchResult]> {
        match self {
            DvdNfoError::NoMatch { candidates, .. } => Some(candidates),
            DvdNfoError::WithContext { source, .. } => source.candidates(),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for DvdNfoError {
    fn from(err: toml::de::Error) -> Self {
        DvdNfoError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for DvdNfoError {
    fn from(err: toml::ser::Error) -> Self {
        DvdNfoError::Toml(err.to_string())
    }
}

/// Result type alias for dvdnfo
pub type Result<T> = std::result::Result<T, DvdNfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DvdNfoError::NoPageLoaded;
        assert!(err.to_string().contains("No detail page loaded"));

        let err = DvdNfoError::SearchTimeout(Duration::from_secs(3));
        assert_eq!(err.to_string(), "Search results did not load within 3s");
    }

    #[test]
    fn test_error_with_context() {
        let err = DvdNfoError::extraction("synopsis", "missing p.synopsis");
        let err = err.with_context("Failed to build record");
        assert!(err.to_string().contains("Failed to build record"));
        assert!(err.to_string().contains("synopsis"));
    }

    #[test]
    fn test_candidates_through_context() {
        let err = DvdNfoError::NoMatch {
            query: "Deliverance".to_string(),
            candidates: vec![SearchResult::new("Deliverance", Some(1972), "/Movie/1")],
        }
        .with_context("search");
        assert_eq!(err.candidates().map(|c| c.len()), Some(1));
        assert!(DvdNfoError::NoPageLoaded.candidates().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DvdNfoError = io_err.into();
        assert!(matches!(err, DvdNfoError::Io(_)));
    }
}
