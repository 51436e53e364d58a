//! Google Calendar events client.

use std::time::Duration;

use chrono::SecondsFormat;
use serde::Deserialize;
use termcal_core::{Attendee, CalendarEvent, EventStart, OAuthToken, ResponseStatus};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, EventSource, FetchOptions};

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

const PROVIDER_NAME: &str = "google";

/// Lists upcoming events through the Calendar v3 `events.list` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleEventSource {
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleEventSource {
    /// Creates a source against the public API.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::configuration("failed to create HTTP client").with_source(e)
            })?;
        Ok(Self {
            http_client,
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Points the source at another API root, e.g. a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn list_events(
        &self,
        token: &OAuthToken,
        options: FetchOptions,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        let Some(limit) = options.limit() else {
            debug!(max_results = options.max_results, "non-positive limit, skipping fetch");
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&options.calendar_id)
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token.access_token)
            .query(&[
                (
                    "timeMin",
                    options.time_min.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("maxResults", limit.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("showDeleted", "false".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    format!("request failed: {}", e)
                };
                ProviderError::network(message).with_source(e)
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication(
                "access token expired or invalid",
            ));
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::authorization("access denied to calendar"));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(format!(
                "calendar '{}' not found",
                options.calendar_id
            )));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;
        let list: EventListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })?;

        let mut events: Vec<CalendarEvent> =
            list.items.into_iter().filter_map(convert_event).collect();
        events.truncate(limit);

        debug!(
            calendar = %options.calendar_id,
            count = events.len(),
            "fetched events"
        );
        Ok(events)
    }
}

impl EventSource for GoogleEventSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_events<'a>(
        &'a self,
        token: &'a OAuthToken,
        options: FetchOptions,
    ) -> BoxFuture<'a, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(async move {
            self.list_events(token, options)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}

/// Drops cancelled items and keeps the start as sent.
fn convert_event(event: ApiEvent) -> Option<CalendarEvent> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let start = EventStart {
        date_time: event.start.date_time,
        date: event.start.date,
    };
    let attendees = event
        .attendees
        .unwrap_or_default()
        .into_iter()
        .map(|a| Attendee {
            email: a.email.unwrap_or_default(),
            response_status: a
                .response_status
                .as_deref()
                .map(ResponseStatus::from_provider)
                .unwrap_or(ResponseStatus::NeedsAction),
            is_self: a.is_self.unwrap_or(false),
        })
        .collect();

    Some(CalendarEvent {
        title: event.summary.unwrap_or_default(),
        start,
        attendees,
    })
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    summary: Option<String>,
    #[serde(default)]
    start: ApiEventTime,
    status: Option<String>,
    attendees: Option<Vec<ApiAttendee>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAttendee {
    email: Option<String>,
    #[serde(rename = "self")]
    is_self: Option<bool>,
    response_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use chrono::{DateTime, TimeZone, Utc};
    use mockito::Matcher;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap()
    }

    fn source(server: &mockito::ServerGuard) -> GoogleEventSource {
        GoogleEventSource::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.url())
    }

    const EVENTS_BODY: &str = r#"{
        "kind": "calendar#events",
        "items": [
            {
                "id": "evt1",
                "summary": "Standup",
                "status": "confirmed",
                "start": {"dateTime": "2025-02-05T10:45:00Z"},
                "attendees": [
                    {"email": "bob@example.com", "responseStatus": "declined"},
                    {"email": "me@example.com", "self": true, "responseStatus": "accepted"}
                ]
            },
            {
                "id": "evt2",
                "summary": "Old plan",
                "status": "cancelled",
                "start": {"dateTime": "2025-02-05T11:00:00Z"}
            },
            {
                "id": "evt3",
                "summary": "Holiday",
                "start": {"date": "2025-02-07"}
            }
        ]
    }"#;

    #[test]
    fn convert_keeps_raw_start_and_self_status() {
        let list: EventListResponse = serde_json::from_str(EVENTS_BODY).unwrap();
        let events: Vec<_> = list.items.into_iter().filter_map(convert_event).collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Standup");
        assert_eq!(
            events[0].start.date_time.as_deref(),
            Some("2025-02-05T10:45:00Z")
        );
        assert_eq!(events[0].self_response(), ResponseStatus::Accepted);
        assert!(events[1].is_all_day());
        assert_eq!(events[1].start.raw(), "2025-02-07");
    }

    #[test]
    fn missing_summary_and_status_default() {
        let event: ApiEvent = serde_json::from_str(
            r#"{"start": {"dateTime": "2025-02-05T10:00:00Z"}, "attendees": [{"self": true}]}"#,
        )
        .unwrap();
        let event = convert_event(event).unwrap();
        assert_eq!(event.title, "");
        assert_eq!(event.attendees[0].response_status, ResponseStatus::NeedsAction);
    }

    #[tokio::test]
    async fn fetch_sends_expected_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/calendars/primary/events")
            .match_header("authorization", "Bearer access-123")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("timeMin".into(), "2025-02-05T10:00:00Z".into()),
                Matcher::UrlEncoded("maxResults".into(), "10".into()),
                Matcher::UrlEncoded("singleEvents".into(), "true".into()),
                Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
                Matcher::UrlEncoded("showDeleted".into(), "false".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(EVENTS_BODY)
            .create_async()
            .await;

        let token = OAuthToken::new("access-123");
        let events = source(&server)
            .fetch_events(&token, FetchOptions::new(now()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn calendar_id_is_url_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/calendars/team%40example.com/events")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let token = OAuthToken::new("access");
        let options = FetchOptions::new(now()).with_calendar_id("team@example.com");
        let events = source(&server).fetch_events(&token, options).await.unwrap();

        mock.assert_async().await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn non_positive_limit_skips_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let token = OAuthToken::new("access");
        let events = source(&server)
            .fetch_events(&token, FetchOptions::new(now()).with_max_results(0))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn status_codes_map_to_errors() {
        let cases = [
            (401, ProviderErrorCode::AuthenticationFailed),
            (403, ProviderErrorCode::AuthorizationFailed),
            (404, ProviderErrorCode::NotFound),
            (429, ProviderErrorCode::RateLimited),
            (500, ProviderErrorCode::ServerError),
        ];
        for (status, code) in cases {
            let mut server = mockito::Server::new_async().await;
            let _mock = server
                .mock("GET", "/calendars/primary/events")
                .match_query(Matcher::Any)
                .with_status(status)
                .create_async()
                .await;

            let token = OAuthToken::new("access");
            let err = source(&server)
                .fetch_events(&token, FetchOptions::new(now()))
                .await
                .unwrap_err();
            assert_eq!(err.code(), code, "status {status}");
            assert_eq!(err.provider(), Some("google"));
        }
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/calendars/primary/events")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let token = OAuthToken::new("access");
        let err = source(&server)
            .fetch_events(&token, FetchOptions::new(now()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }
}
