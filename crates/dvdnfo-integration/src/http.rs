//! HTTP browsing contexts

use dvdnfo_core::config::CatalogConfig;
use dvdnfo_core::document::Document;
use dvdnfo_core::error::{DvdNfoError, Result};
use dvdnfo_core::loader::{BrowsingContext, PageLoader};
use dvdnfo_core::types::CookieJar;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Agent timeouts and polling cadence
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    /// Bound on any single request
    pub page_timeout: Duration,
    /// Pause between re-fetches while waiting for an element
    pub poll_interval: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from(&CatalogConfig::default())
    }
}

impl From<&CatalogConfig> for HttpSettings {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            user_agent: config.user_agent.clone(),
        }
    }
}

pub(crate) fn http_error(url: &str, error: ureq::Error) -> DvdNfoError {
    let message = match error {
        ureq::Error::Status(code, _) => format!("status {}", code),
        ureq::Error::Transport(transport) => transport.to_string(),
    };
    DvdNfoError::Http {
        url: url.to_string(),
        message,
    }
}

/// Page loader issuing plain GET requests
#[derive(Debug, Clone)]
pub struct HttpPageLoader {
    agent: ureq::Agent,
    settings: HttpSettings,
}

impl HttpPageLoader {
    pub fn new(settings: HttpSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(settings.page_timeout)
            .timeout_read(settings.page_timeout)
            .timeout_write(settings.page_timeout)
            .user_agent(&settings.user_agent)
            .build();

        Self { agent, settings }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(HttpSettings::from(config))
    }

    pub fn settings(&self) -> &HttpSettings {
        &self.settings
    }

    pub(crate) fn agent(&self) -> &ureq::Agent {
        &self.agent
    }
}

impl PageLoader for HttpPageLoader {
    fn open(&self, cookies: Option<&CookieJar>) -> Result<Box<dyn BrowsingContext>> {
        debug!(
            "Opening HTTP context ({} cookies)",
            cookies.map(CookieJar::len).unwrap_or(0)
        );
        Ok(Box::new(HttpContext {
            agent: self.agent.clone(),
            cookies: cookies.cloned(),
            settings: self.settings.clone(),
            page: None,
        }))
    }
}

struct FetchedPage {
    url: String,
    html: String,
}

/// One context: the last fetched page and the cookies to send
struct HttpContext {
    agent: ureq::Agent,
    cookies: Option<CookieJar>,
    settings: HttpSettings,
    page: Option<FetchedPage>,
}

impl HttpContext {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        let mut request = self
            .agent
            .get(url)
            .set("Accept", "text/html,application/xhtml+xml")
            .timeout(timeout.min(self.settings.page_timeout));

        if let Some(header) = self
            .cookies
            .as_ref()
            .and_then(|jar| jar.header_for(url, chrono::Utc::now().timestamp()))
        {
            request = request.set("Cookie", &header);
        }

        let response = request.call().map_err(|e| http_error(url, e))?;
        response.into_string().map_err(|e| DvdNfoError::Http {
            url: url.to_string(),
            message: format!("Failed to read response: {}", e),
        })
    }
}

impl BrowsingContext for HttpContext {
    fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("GET {}", url);
        let html = self.fetch(url, self.settings.page_timeout)?;
        self.page = Some(FetchedPage {
            url: url.to_string(),
            html,
        });
        Ok(())
    }

    /// Re-fetches never run past `timeout`; a page that arrives after the
    /// deadline counts as not found.
    fn wait_for_element(&mut self, element_id: &str, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let page = self.page.as_ref().ok_or(DvdNfoError::NoPageLoaded)?;
            if Document::parse(&page.html).has_id(element_id) {
                return Ok(true);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            thread::sleep(self.settings.poll_interval.min(deadline - now));

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }

            trace!("#{} not present yet, re-fetching", element_id);
            let url = page.url.clone();
            let html = match self.fetch(&url, remaining) {
                Ok(html) => html,
                Err(_) if Instant::now() >= deadline => {
                    debug!("Re-fetch of {} cut off at the wait deadline", url);
                    return Ok(false);
                }
                Err(e) => return Err(e),
            };
            let late = Instant::now() >= deadline;
            self.page = Some(FetchedPage { url, html });
            if late {
                return Ok(false);
            }
        }
    }

    fn document(&self) -> Result<Document> {
        let page = self.page.as_ref().ok_or(DvdNfoError::NoPageLoaded)?;
        Ok(Document::parse(&page.html))
    }
}

impl Drop for HttpContext {
    fn drop(&mut self) {
        trace!("Released HTTP context");
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::{self, Receiver};
    use std::thread;
    use std::time::Duration;

    /// Serve `responses` to consecutive connections and report each raw request
    pub fn serve(responses: Vec<(u16, String)>) -> (String, Receiver<String>) {
        serve_delayed(
            responses
                .into_iter()
                .map(|(status, body)| (status, body, Duration::ZERO))
                .collect(),
        )
    }

    /// Like [`serve`], holding each response back for its delay
    pub fn serve_delayed(responses: Vec<(u16, String, Duration)>) -> (String, Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body, delay) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
                thread::sleep(delay);

                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (base, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::{serve, serve_delayed};
    use super::*;
    use dvdnfo_core::types::CookieRecord;
    use pretty_assertions::assert_eq;

    fn fast_settings() -> HttpSettings {
        HttpSettings {
            page_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
            user_agent: "dvdnfo-test".to_string(),
        }
    }

    #[test]
    fn test_settings_from_config() {
        let settings = HttpSettings::default();
        assert_eq!(settings.page_timeout, Duration::from_secs(15));
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_context_before_navigate() {
        let loader = HttpPageLoader::new(fast_settings());
        let mut ctx = loader.open(None).unwrap();
        assert!(matches!(ctx.document(), Err(DvdNfoError::NoPageLoaded)));
        assert!(matches!(
            ctx.wait_for_element("x", Duration::from_millis(1)),
            Err(DvdNfoError::NoPageLoaded)
        ));
    }

    #[test]
    fn test_navigate_sends_cookies_and_user_agent() {
        let (base, requests) = serve(vec![(200, r#"<div id="searchResultsItems"></div>"#.to_string())]);
        let jar = CookieJar::new(vec![CookieRecord::new("127.0.0.1", "NetflixId", "abc")]);

        let loader = HttpPageLoader::new(fast_settings());
        let mut ctx = loader.open(Some(&jar)).unwrap();
        ctx.navigate(&format!("{}/Search?v1=Deliverance", base)).unwrap();

        assert!(ctx.wait_for_element("searchResultsItems", Duration::from_secs(1)).unwrap());
        let request = requests.recv().unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /search?v1=deliverance"));
        assert!(request.contains("cookie: netflixid=abc"));
        assert!(request.contains("user-agent: dvdnfo-test"));
    }

    #[test]
    fn test_wait_gives_up_at_deadline() {
        let pages: Vec<(u16, String)> = (0..50).map(|_| (200, "<p>loading</p>".to_string())).collect();
        let (base, _requests) = serve(pages);

        let loader = HttpPageLoader::new(fast_settings());
        let mut ctx = loader.open(None).unwrap();
        ctx.navigate(&base).unwrap();

        let started = Instant::now();
        assert!(!ctx.wait_for_element("searchResultsItems", Duration::from_millis(50)).unwrap());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_wait_does_not_outlive_deadline_on_slow_refetch() {
        let (base, _requests) = serve_delayed(vec![
            (200, "<p>loading</p>".to_string(), Duration::ZERO),
            (200, r#"<div id="searchResultsItems"></div>"#.to_string(), Duration::from_secs(3)),
        ]);

        let loader = HttpPageLoader::new(fast_settings());
        let mut ctx = loader.open(None).unwrap();
        ctx.navigate(&base).unwrap();

        let started = Instant::now();
        assert!(!ctx.wait_for_element("searchResultsItems", Duration::from_millis(200)).unwrap());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_status_error() {
        let (base, _requests) = serve(vec![(404, String::new())]);
        let loader = HttpPageLoader::new(fast_settings());
        let mut ctx = loader.open(None).unwrap();

        let err = ctx.navigate(&format!("{}/Movie/Missing/1", base)).unwrap_err();
        match err {
            DvdNfoError::Http { message, .. } => assert_eq!(message, "status 404"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
