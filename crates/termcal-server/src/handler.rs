//! Render requests end to end.
//!
//! [`RenderService`] validates the request, resolves the user's credential,
//! refreshes an expired token when it can, fetches events and hands them to
//! the core formatter. Lookup, refresh and fetch share one deadline.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use termcal_core::{AgendaFormatter, CredentialRecord, OAuthToken, RenderRequest};
use termcal_providers::google::TokenRefresher;
use termcal_providers::{DEFAULT_CALENDAR_ID, EventSource, FetchOptions};
use tracing::{debug, info, warn};

use crate::cache::CredentialCache;
use crate::error::{ServerError, ServerResult};

/// Default upper bound on credential lookup, refresh and fetch together.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Everything needed to turn a [`RenderRequest`] into agenda text.
pub struct RenderService {
    cache: Arc<CredentialCache>,
    source: Arc<dyn EventSource>,
    refresher: Option<TokenRefresher>,
    fetch_timeout: Duration,
    calendar_id: String,
}

impl std::fmt::Debug for RenderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderService")
            .field("source", &self.source.name())
            .field("refresh", &self.refresher.is_some())
            .field("fetch_timeout", &self.fetch_timeout)
            .field("calendar_id", &self.calendar_id)
            .finish_non_exhaustive()
    }
}

impl RenderService {
    pub fn new(cache: Arc<CredentialCache>, source: Arc<dyn EventSource>) -> Self {
        Self {
            cache,
            source,
            refresher: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        }
    }

    /// Enables refreshing expired access tokens.
    #[must_use]
    pub fn with_refresher(mut self, refresher: TokenRefresher) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Sets the deadline shared by credential lookup, refresh and fetch.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    pub fn cache(&self) -> &Arc<CredentialCache> {
        &self.cache
    }

    /// Renders the agenda for `request` as of now.
    pub async fn render(&self, request: RenderRequest) -> ServerResult<String> {
        self.render_at(request, Utc::now()).await
    }

    /// Renders the agenda with a fixed reference instant.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any credential lookup or fetch.
    pub async fn render_at(
        &self,
        mut request: RenderRequest,
        now: DateTime<Utc>,
    ) -> ServerResult<String> {
        request.prepare()?;
        let formatter = AgendaFormatter::new(&request)?;
        debug!(request = %request, "rendering");

        let lookup_and_fetch = async {
            let record = self.cache.get(&request.user_id).await?;
            let token = self.usable_token(record, now).await?;
            let options = FetchOptions::new(now)
                .with_max_results(request.max_results)
                .with_calendar_id(&self.calendar_id);
            Ok::<_, ServerError>(self.source.fetch_events(&token, options).await?)
        };
        let events = tokio::time::timeout(self.fetch_timeout, lookup_and_fetch)
            .await
            .map_err(|_| ServerError::UpstreamTimeout {
                seconds: self.fetch_timeout.as_secs(),
            })??;

        Ok(formatter.format_at(&events, now))
    }

    /// Returns a token that is not known to be expired, refreshing and
    /// storing a replacement when possible.
    async fn usable_token(
        &self,
        record: CredentialRecord,
        now: DateTime<Utc>,
    ) -> ServerResult<OAuthToken> {
        if !record.token.is_expired_at(now) {
            return Ok(record.token);
        }
        let Some(refresher) = &self.refresher else {
            debug!(id = %record.id, "token expired and refresh is not configured");
            return Ok(record.token);
        };

        let token = refresher.refresh(&record.token, now).await?;
        info!(id = %record.id, "refreshed expired access token");
        if let Err(e) = self.cache.put(record.with_token(token.clone())).await {
            warn!(id = %record.id, error = %e, "failed to store refreshed token");
        }
        Ok(token)
    }
}
