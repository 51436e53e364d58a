//! Google Calendar event source.
//!
//! [`GoogleEventSource`] lists upcoming single-instance events for the
//! bearer token it is handed. [`TokenRefresher`] trades a stored refresh
//! token for a new access token once the old one expires.
//!
//! ```ignore
//! use termcal_providers::google::GoogleEventSource;
//! use termcal_providers::{EventSource, FetchOptions};
//!
//! let source = GoogleEventSource::new(Duration::from_secs(15))?;
//! let events = source
//!     .fetch_events(&record.token, FetchOptions::new(Utc::now()))
//!     .await?;
//! ```

mod client;
mod oauth;

pub use client::{CALENDAR_API_BASE, GoogleEventSource};
pub use oauth::{GOOGLE_TOKEN_URL, OAuthCredentials, TokenRefresher};
