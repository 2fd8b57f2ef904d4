//! Catalog session: search, disambiguation, page load, field access

use std::time::Duration;

use super::extract;
use super::layout;
use crate::config::CatalogConfig;
use crate::document::Document;
use crate::error::{DvdNfoError, Result};
use crate::links;
use crate::loader::{BrowsingContext, CookieSource, PageLoader};
use crate::matching::MatchCriteria;
use crate::observer::{SessionEvent, SessionObserver, TracingObserver};
use crate::types::{CookieJar, MovieRecord, SearchQuery, SearchResult};

/// Settings a session runs with
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Scheme and host of the catalog, without trailing slash
    pub base_url: String,
    /// Bound on waiting for search results to render
    pub search_timeout: Duration,
    pub criteria: MatchCriteria,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&CatalogConfig::default())
    }
}

impl From<&CatalogConfig> for SessionSettings {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            criteria: config.match_criteria(),
        }
    }
}

/// Operator's answer when no candidate matched automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualChoice {
    /// Load the candidate at this position
    Index(usize),
    /// None of the candidates is the title
    NoneApply,
}

/// Whether a detail page is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    PageLoaded,
}

struct LoadedPage {
    url: String,
    name: String,
    year: Option<i32>,
    document: Document,
}

/// A browsing session against the catalog.
///
/// Cookies are read once at construction and never change afterwards. Each
/// successful `search` or `load_by_url` replaces the loaded page as a whole;
/// a failed one leaves the previous page in place.
pub struct CatalogSession {
    loader: Box<dyn PageLoader>,
    cookies: Option<CookieJar>,
    settings: SessionSettings,
    observer: Box<dyn SessionObserver>,
    current: Option<LoadedPage>,
}

impl CatalogSession {
    /// Create a session reporting to `tracing`
    pub fn new(
        loader: impl PageLoader + 'static,
        cookie_source: &dyn CookieSource,
        settings: SessionSettings,
    ) -> Self {
        Self::with_observer(loader, cookie_source, settings, TracingObserver)
    }

    /// Create a session reporting to the given observer.
    ///
    /// A cookie source that fails or yields no cookies gives an anonymous
    /// session; that is reported, never returned as an error.
    pub fn with_observer(
        loader: impl PageLoader + 'static,
        cookie_source: &dyn CookieSource,
        settings: SessionSettings,
        observer: impl SessionObserver + 'static,
    ) -> Self {
        let cookies = match cookie_source.load() {
            Ok(jar) if !jar.is_empty() => {
                observer.on_event(&SessionEvent::CookiesLoaded { count: jar.len() });
                Some(jar)
            }
            Ok(_) => {
                observer.on_event(&SessionEvent::CookiesUnavailable {
                    reason: format!("{} is empty", cookie_source.describe()),
                });
                None
            }
            Err(e) => {
                observer.on_event(&SessionEvent::CookiesUnavailable {
                    reason: e.to_string(),
                });
                None
            }
        };

        Self {
            loader: Box::new(loader),
            cookies,
            settings,
            observer: Box::new(observer),
            current: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::PageLoaded
        } else {
            SessionState::Ready
        }
    }

    /// Whether cookies were loaded at construction
    pub fn is_authenticated(&self) -> bool {
        self.cookies.is_some()
    }

    pub fn cookies(&self) -> Option<&CookieJar> {
        self.cookies.as_ref()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Search the catalog and load the detail page of the accepted candidate.
    ///
    /// Candidates are taken in the site's ranking order and the first one
    /// passing the similarity and year filters wins under the default
    /// policy. `NoMatch` carries every rendered row for manual selection.
    pub fn search(&mut self, title: &str, year: Option<i32>) -> Result<SearchResult> {
        let query = SearchQuery::new(title, year);
        let url = links::search_url(&self.settings.base_url, &query.title);
        self.emit(SessionEvent::SearchStarted { url: url.clone() });

        let mut ctx = self.loader.open(self.cookies.as_ref())?;
        ctx.navigate(&url)?;

        let waited = self.settings.search_timeout;
        if !ctx.wait_for_element(layout::RESULTS_READY_ID, waited)? {
            self.emit(SessionEvent::SearchTimedOut { url, waited });
            return Err(DvdNfoError::SearchTimeout(waited));
        }

        let candidates = extract::candidates(&ctx.document()?, &self.settings.base_url)?;
        self.emit(SessionEvent::CandidatesParsed {
            count: candidates.len(),
        });

        let selected = self
            .settings
            .criteria
            .select(&query, &candidates)
            .map(|m| (m.candidate.clone(), m.score));
        let Some((chosen, score)) = selected else {
            self.emit(SessionEvent::NoCandidateMatched {
                query: query.to_string(),
            });
            return Err(DvdNfoError::NoMatch {
                query: query.to_string(),
                candidates,
            });
        };
        self.emit(SessionEvent::CandidateMatched {
            url: chosen.detail_url.clone(),
            score,
        });

        let page = self.load_detail(ctx.as_mut(), &chosen.detail_url, Some(&chosen))?;
        self.current = Some(page);
        Ok(chosen)
    }

    /// Resolve a `NoMatch` by hand
    pub fn select_candidate(
        &mut self,
        candidates: &[SearchResult],
        choice: ManualChoice,
    ) -> Result<Option<SearchResult>> {
        match choice {
            ManualChoice::NoneApply => Ok(None),
            ManualChoice::Index(index) => {
                let candidate = candidates.get(index).ok_or(DvdNfoError::InvalidSelection {
                    index,
                    available: candidates.len(),
                })?;
                self.load_by_url(&candidate.detail_url)?;
                Ok(Some(candidate.clone()))
            }
        }
    }

    /// Load a detail page directly, skipping search
    pub fn load_by_url(&mut self, url: &str) -> Result<()> {
        let url = links::absolutize(&self.settings.base_url, url);
        let mut ctx = self.loader.open(self.cookies.as_ref())?;
        let page = self.load_detail(ctx.as_mut(), &url, None)?;
        self.current = Some(page);
        Ok(())
    }

    fn load_detail(
        &self,
        ctx: &mut dyn BrowsingContext,
        url: &str,
        fallback: Option<&SearchResult>,
    ) -> Result<LoadedPage> {
        let fetched = ctx.navigate(url).and_then(|_| ctx.document());
        let document = match fetched {
            Ok(document) => document,
            Err(e) => {
                self.emit(SessionEvent::PageLoadFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let (name, year) = match (extract::heading(&document)?, fallback) {
            (Some(heading), _) => heading,
            (None, Some(candidate)) => (candidate.display_name.clone(), candidate.year),
            (None, None) => {
                let message = "title heading not found".to_string();
                self.emit(SessionEvent::PageLoadFailed {
                    url: url.to_string(),
                    message: message.clone(),
                });
                return Err(DvdNfoError::PageLoad {
                    url: url.to_string(),
                    message,
                });
            }
        };

        self.emit(SessionEvent::PageLoaded {
            url: url.to_string(),
        });
        Ok(LoadedPage {
            url: url.to_string(),
            name,
            year,
            document,
        })
    }

    fn page(&self) -> Result<&LoadedPage> {
        self.current.as_ref().ok_or(DvdNfoError::NoPageLoaded)
    }

    fn emit(&self, event: SessionEvent) {
        self.observer.on_event(&event);
    }

    pub fn current_url(&self) -> Result<&str> {
        Ok(&self.page()?.url)
    }

    pub fn movie_name(&self) -> Result<&str> {
        Ok(&self.page()?.name)
    }

    pub fn movie_year(&self) -> Result<Option<i32>> {
        Ok(self.page()?.year)
    }

    pub fn synopsis(&self) -> Result<String> {
        extract::synopsis(&self.page()?.document)
    }

    pub fn genres(&self) -> Result<Vec<String>> {
        extract::genres(&self.page()?.document)
    }

    pub fn moods(&self) -> Result<Option<Vec<String>>> {
        let moods = extract::moods(&self.page()?.document)?;
        if moods.is_none() {
            self.emit(SessionEvent::MoodsMissing);
        }
        Ok(moods)
    }

    /// Personalized rating; `None` without touching the page when anonymous
    pub fn guess_rating(&self) -> Result<Option<f64>> {
        match self.rated_document()? {
            Some(doc) => extract::guess_rating(doc),
            None => Ok(None),
        }
    }

    pub fn avg_rating(&self) -> Result<Option<f64>> {
        match self.rated_document()? {
            Some(doc) => extract::avg_rating(doc),
            None => Ok(None),
        }
    }

    pub fn num_votes(&self) -> Result<Option<u64>> {
        match self.rated_document()? {
            Some(doc) => extract::num_votes(doc),
            None => Ok(None),
        }
    }

    /// Loaded document when ratings can be read from it
    fn rated_document(&self) -> Result<Option<&Document>> {
        if self.cookies.is_none() {
            return Ok(None);
        }
        let doc = &self.page()?.document;
        if !extract::has_rating_panel(doc) {
            self.emit(SessionEvent::RatingPanelMissing);
            return Ok(None);
        }
        Ok(Some(doc))
    }

    pub fn image_url(&self) -> Result<String> {
        extract::image_url(&self.page()?.document, &self.settings.base_url)
    }

    /// Everything on the loaded page in one record
    pub fn movie_record(&self) -> Result<MovieRecord> {
        let page = self.page()?;
        let image_url = match self.image_url() {
            Ok(url) => Some(url),
            Err(DvdNfoError::Extraction { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(MovieRecord {
            name: page.name.clone(),
            year: page.year,
            synopsis: self.synopsis()?,
            genres: self.genres()?,
            moods: self.moods()?,
            guess_rating: self.guess_rating()?,
            avg_rating: self.avg_rating()?,
            num_votes: self.num_votes()?,
            image_url,
            source_url: page.url.clone(),
        })
    }
}
