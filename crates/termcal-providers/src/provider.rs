//! The [`EventSource`] trait and simple in-process sources.
//!
//! A source returns upcoming events for one credential, already expanded
//! into single instances and ordered by start time. Rendering never
//! re-sorts what it receives.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use termcal_core::{CalendarEvent, DEFAULT_MAX_RESULTS, OAuthToken};

use crate::error::{ProviderError, ProviderResult};

/// Calendar fetched when none is configured.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// What to fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Lower bound on event end time.
    pub time_min: DateTime<Utc>,
    /// Upper bound on the number of events. Values `<= 0` fetch nothing.
    pub max_results: i64,
    pub calendar_id: String,
}

impl FetchOptions {
    pub fn new(time_min: DateTime<Utc>) -> Self {
        Self {
            time_min,
            max_results: DEFAULT_MAX_RESULTS,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        }
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Returns the limit as a count, or `None` when nothing should be fetched.
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.max_results).ok().filter(|n| *n > 0)
    }
}

/// A boxed future so the trait stays object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A backend that lists upcoming events for an authorized user.
pub trait EventSource: Send + Sync {
    /// Short name used in logs and error tags.
    fn name(&self) -> &str;

    /// Fetches upcoming events ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on transport, authorization or decoding
    /// failures.
    fn fetch_events<'a>(
        &'a self,
        token: &'a OAuthToken,
        options: FetchOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>>;
}

/// Serves a fixed list of events, honoring `max_results`.
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<CalendarEvent>,
}

impl StaticEventSource {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }
}

impl EventSource for StaticEventSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_events<'a>(
        &'a self,
        _token: &'a OAuthToken,
        options: FetchOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
        let events = match options.limit() {
            Some(limit) => self.events.iter().take(limit).cloned().collect(),
            None => Vec::new(),
        };
        Box::pin(async move { Ok(events) })
    }
}

/// A source that always fails with the same error.
#[derive(Debug)]
pub struct ErrorEventSource {
    name: String,
    error: ProviderError,
}

impl ErrorEventSource {
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl EventSource for ErrorEventSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events<'a>(
        &'a self,
        _token: &'a OAuthToken,
        _options: FetchOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
        let error = self.error.duplicate().with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::TimeZone;
    use termcal_core::EventStart;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap()
    }

    fn events(n: usize) -> Vec<CalendarEvent> {
        (0..n)
            .map(|i| {
                CalendarEvent::new(
                    format!("Event {i}"),
                    EventStart::timed(format!("2025-02-05T1{i}:00:00Z")),
                )
            })
            .collect()
    }

    #[test]
    fn fetch_options_defaults() {
        let options = FetchOptions::new(now());
        assert_eq!(options.max_results, 10);
        assert_eq!(options.calendar_id, "primary");
        assert_eq!(options.limit(), Some(10));
    }

    #[test]
    fn non_positive_limit_is_none() {
        assert_eq!(FetchOptions::new(now()).with_max_results(0).limit(), None);
        assert_eq!(FetchOptions::new(now()).with_max_results(-4).limit(), None);
        assert_eq!(FetchOptions::new(now()).with_max_results(3).limit(), Some(3));
    }

    #[tokio::test]
    async fn static_source_truncates() {
        let source = StaticEventSource::new(events(5));
        let token = OAuthToken::new("access");

        let fetched = source
            .fetch_events(&token, FetchOptions::new(now()).with_max_results(2))
            .await
            .unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].title, "Event 0");

        let fetched = source
            .fetch_events(&token, FetchOptions::new(now()).with_max_results(0))
            .await
            .unwrap();
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn error_source_always_fails() {
        let source = ErrorEventSource::new("broken", ProviderError::server("boom"));
        let token = OAuthToken::new("access");

        for _ in 0..2 {
            let err = source
                .fetch_events(&token, FetchOptions::new(now()))
                .await
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::ServerError);
            assert_eq!(err.provider(), Some("broken"));
        }
    }
}
