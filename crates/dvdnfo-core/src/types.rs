//! Core type definitions for dvdnfo

use serde::{Deserialize, Serialize};
use std::fmt;

/// A title search against the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text title, as the operator or descriptor spells it
    pub title: String,
    /// Premiere year used to disambiguate remakes
    pub year: Option<i32>,
}

impl SearchQuery {
    /// Create a query for a title with an optional year
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }

    /// Title normalized for similarity scoring
    pub fn normalized_title(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}

/// One candidate row from a results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Title as rendered in the result link
    pub display_name: String,
    /// Year label; `None` when the row has no numeric year
    pub year: Option<i32>,
    /// Detail page link, absolute once parsed by the session
    pub detail_url: String,
}

impl SearchResult {
    /// Create a new candidate
    pub fn new(
        display_name: impl Into<String>,
        year: Option<i32>,
        detail_url: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            year,
            detail_url: detail_url.into(),
        }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({}) {}", self.display_name, year, self.detail_url),
            None => write!(f, "{} (?) {}", self.display_name, self.detail_url),
        }
    }
}

/// Everything scraped from one detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub name: String,
    pub year: Option<i32>,
    pub synopsis: String,
    pub genres: Vec<String>,
    pub moods: Option<Vec<String>>,
    /// Personalized 5-star prediction, only when signed in
    pub guess_rating: Option<f64>,
    /// Community 5-star average, only when signed in
    pub avg_rating: Option<f64>,
    pub num_votes: Option<u64>,
    pub image_url: Option<String>,
    pub source_url: String,
}

/// A single browser cookie, in the JSON layout browser cookie-export extensions produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    pub name: String,
    pub value: String,
    /// Seconds since the unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
    #[serde(default)]
    pub host_only: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub session: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

impl CookieRecord {
    /// Create a cookie for a domain
    pub fn new(domain: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            path: default_cookie_path(),
            name: name.into(),
            value: value.into(),
            expiration_date: None,
            host_only: false,
            http_only: false,
            secure: false,
            session: true,
            same_site: None,
            store_id: None,
            id: None,
        }
    }

    /// Whether the cookie has expired at `now` (unix seconds)
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expiration_date {
            Some(expiry) if !self.session => expiry < now as f64,
            _ => false,
        }
    }

    /// Whether the cookie should be sent to `host`
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let domain = self.domain.trim_start_matches('.').to_ascii_lowercase();
        if self.host_only {
            return host == domain;
        }
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    /// Whether the cookie path covers `request_path` (RFC 6265 path-match)
    pub fn matches_path(&self, request_path: &str) -> bool {
        let cookie_path = self.path.as_str();
        if cookie_path.is_empty() || request_path == cookie_path {
            return true;
        }
        request_path.starts_with(cookie_path)
            && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
    }
}

/// The authenticated cookie set a session is built with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar {
    cookies: Vec<CookieRecord>,
}

impl CookieJar {
    /// Create a jar from records
    pub fn new(cookies: Vec<CookieRecord>) -> Self {
        Self { cookies }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CookieRecord> {
        self.cookies.iter()
    }

    /// `Cookie` header value for a request to `url`.
    ///
    /// Expired records, records scoped to another path and secure-only
    /// records on a plain `http` request are skipped.
    pub fn header_for(&self, url: &str, now: i64) -> Option<String> {
        let url = url::Url::parse(url).ok()?;
        let host = url.host_str()?;
        let https = url.scheme() == "https";
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| c.matches_host(host) && c.matches_path(url.path()))
            .filter(|c| (https || !c.secure) && !c.is_expired(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}
