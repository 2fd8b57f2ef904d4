//! Session event reporting
//!
//! A [`CatalogSession`](crate::session::CatalogSession) reports what it does
//! through an injected [`SessionObserver`] instead of logging globally.
//! [`TracingObserver`] forwards events to `tracing`.

use std::time::Duration;

/// Something that happened inside a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CookiesLoaded { count: usize },
    CookiesUnavailable { reason: String },
    SearchStarted { url: String },
    SearchTimedOut { url: String, waited: Duration },
    CandidatesParsed { count: usize },
    CandidateMatched { url: String, score: u8 },
    NoCandidateMatched { query: String },
    PageLoaded { url: String },
    PageLoadFailed { url: String, message: String },
    MoodsMissing,
    RatingPanelMissing,
}

/// Severity of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl SessionEvent {
    /// Severity the event is reported at
    pub fn level(&self) -> EventLevel {
        match self {
            SessionEvent::CandidatesParsed { .. } => EventLevel::Debug,
            SessionEvent::CookiesLoaded { .. }
            | SessionEvent::CookiesUnavailable { .. }
            | SessionEvent::SearchStarted { .. }
            | SessionEvent::CandidateMatched { .. }
            | SessionEvent::PageLoaded { .. }
            | SessionEvent::MoodsMissing => EventLevel::Info,
            SessionEvent::RatingPanelMissing => EventLevel::Warn,
            SessionEvent::SearchTimedOut { .. }
            | SessionEvent::NoCandidateMatched { .. }
            | SessionEvent::PageLoadFailed { .. } => EventLevel::Error,
        }
    }

    /// Human readable description
    pub fn message(&self) -> String {
        match self {
            SessionEvent::CookiesLoaded { count } => format!("Loaded {} cookies", count),
            SessionEvent::CookiesUnavailable { reason } => {
                format!("No cookies were loaded, continuing anonymously: {}", reason)
            }
            SessionEvent::SearchStarted { url } => format!("Search url: {}", url),
            SessionEvent::SearchTimedOut { url, waited } => {
                format!("Search results did not load after {:?}: {}", waited, url)
            }
            SessionEvent::CandidatesParsed { count } => format!("Parsed {} search candidates", count),
            SessionEvent::CandidateMatched { url, score } => {
                format!("Matched {} (similarity {})", url, score)
            }
            SessionEvent::NoCandidateMatched { query } => {
                format!("No matching titles were found for '{}'", query)
            }
            SessionEvent::PageLoaded { url } => format!("Loaded detail page {}", url),
            SessionEvent::PageLoadFailed { url, message } => {
                format!("Detail page {} failed: {}", url, message)
            }
            SessionEvent::MoodsMissing => "No moods found for this title".to_string(),
            SessionEvent::RatingPanelMissing => {
                "Rating panel missing although cookies were supplied; they may have expired".to_string()
            }
        }
    }
}

/// Receives session events
pub trait SessionObserver {
    fn on_event(&self, event: &SessionEvent);
}

/// Observer that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_event(&self, event: &SessionEvent) {
        let message = event.message();
        match event.level() {
            EventLevel::Debug => tracing::debug!("{}", message),
            EventLevel::Info => tracing::info!("{}", message),
            EventLevel::Warn => tracing::warn!("{}", message),
            EventLevel::Error => tracing::error!("{}", message),
        }
    }
}

/// Observer that keeps every event, for tests
#[cfg(test)]
pub mod recording {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default)]
    pub struct RecordingObserver {
        events: Rc<RefCell<Vec<SessionEvent>>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<SessionEvent> {
            self.events.borrow().clone()
        }
    }

    impl SessionObserver for RecordingObserver {
        fn on_event(&self, event: &SessionEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_levels() {
        assert_eq!(SessionEvent::MoodsMissing.level(), EventLevel::Info);
        assert_eq!(SessionEvent::RatingPanelMissing.level(), EventLevel::Warn);
        assert_eq!(
            SessionEvent::NoCandidateMatched { query: "x".into() }.level(),
            EventLevel::Error
        );
    }

    #[test]
    fn test_event_message() {
        let event = SessionEvent::CandidateMatched {
            url: "https://dvd.netflix.com/Movie/1".to_string(),
            score: 92,
        };
        assert_eq!(event.message(), "Matched https://dvd.netflix.com/Movie/1 (similarity 92)");
    }

    #[test]
    fn test_recording_observer() {
        let observer = recording::RecordingObserver::new();
        let handle = observer.clone();
        observer.on_event(&SessionEvent::MoodsMissing);
        assert_eq!(handle.events(), vec![SessionEvent::MoodsMissing]);
    }
}
