//! Page loading and cookie source abstractions
//!
//! The session never talks to the network itself. A [`PageLoader`] opens a
//! [`BrowsingContext`] per operation; dropping the context releases it, so
//! every exit path of a session operation tears it down.

use std::time::Duration;

use crate::document::Document;
use crate::error::{DvdNfoError, Result};
use crate::types::CookieJar;

/// One browsing context: navigate, wait for content, read the document
pub trait BrowsingContext {
    /// Navigate to an absolute URL
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Wait until an element with `element_id` is present, up to `timeout`.
    /// Returns `false` when the bound elapses first.
    fn wait_for_element(&mut self, element_id: &str, timeout: Duration) -> Result<bool>;

    /// Parsed document of the current page
    fn document(&self) -> Result<Document>;
}

/// Opens browsing contexts with a cookie set applied
pub trait PageLoader {
    fn open(&self, cookies: Option<&CookieJar>) -> Result<Box<dyn BrowsingContext>>;
}

/// Where a session gets its cookies from
pub trait CookieSource {
    fn load(&self) -> Result<CookieJar>;

    /// Short description for diagnostics
    fn describe(&self) -> String {
        "cookie source".to_string()
    }
}

/// Source for sessions that should stay anonymous
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCookies;

impl CookieSource for NoCookies {
    fn load(&self) -> Result<CookieJar> {
        Err(DvdNfoError::Config("no cookie source configured".to_string()))
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

impl CookieSource for CookieJar {
    fn load(&self) -> Result<CookieJar> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory cookies", self.len())
    }
}

/// In-memory pages keyed by URL, for tests
#[cfg(test)]
pub mod fixture {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Loader serving fixed HTML and counting context lifetimes
    #[derive(Clone, Default)]
    pub struct FixtureLoader {
        pages: Rc<RefCell<HashMap<String, String>>>,
        opened: Rc<Cell<usize>>,
        released: Rc<Cell<usize>>,
        navigations: Rc<RefCell<Vec<String>>>,
        cookies_seen: Rc<RefCell<Vec<Option<usize>>>>,
    }

    impl FixtureLoader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
            self.insert(url, html);
            self
        }

        pub fn insert(&self, url: impl Into<String>, html: impl Into<String>) {
            self.pages.borrow_mut().insert(url.into(), html.into());
        }

        pub fn opened(&self) -> usize {
            self.opened.get()
        }

        pub fn released(&self) -> usize {
            self.released.get()
        }

        pub fn navigations(&self) -> Vec<String> {
            self.navigations.borrow().clone()
        }

        /// Cookie count each context was opened with
        pub fn cookies_seen(&self) -> Vec<Option<usize>> {
            self.cookies_seen.borrow().clone()
        }
    }

    impl PageLoader for FixtureLoader {
        fn open(&self, cookies: Option<&CookieJar>) -> Result<Box<dyn BrowsingContext>> {
            self.opened.set(self.opened.get() + 1);
            self.cookies_seen.borrow_mut().push(cookies.map(CookieJar::len));
            Ok(Box::new(FixtureContext {
                loader: self.clone(),
                current: None,
            }))
        }
    }

    struct FixtureContext {
        loader: FixtureLoader,
        current: Option<String>,
    }

    impl BrowsingContext for FixtureContext {
        fn navigate(&mut self, url: &str) -> Result<()> {
            self.loader.navigations.borrow_mut().push(url.to_string());
            match self.loader.pages.borrow().get(url) {
                Some(html) => {
                    self.current = Some(html.clone());
                    Ok(())
                }
                None => Err(DvdNfoError::Http {
                    url: url.to_string(),
                    message: "status 404".to_string(),
                }),
            }
        }

        fn wait_for_element(&mut self, element_id: &str, _timeout: Duration) -> Result<bool> {
            Ok(self.document()?.has_id(element_id))
        }

        fn document(&self) -> Result<Document> {
            self.current
                .as_deref()
                .map(Document::parse)
                .ok_or(DvdNfoError::NoPageLoaded)
        }
    }

    impl Drop for FixtureContext {
        fn drop(&mut self) {
            self.loader.released.set(self.loader.released.get() + 1);
        }
    }
}
