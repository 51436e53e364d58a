//! Event sources for the termcal renderer.
//!
//! - [`EventSource`] - the trait every backend implements
//! - [`google::GoogleEventSource`] - Google Calendar v3
//! - [`StaticEventSource`] / [`ErrorEventSource`] - in-process sources for
//!   tests and offline rendering
//!
//! ```text
//! ┌──────────────────┐   ┌───────────────────┐
//! │ Google Calendar  │   │ fixed event list  │
//! └────────┬─────────┘   └─────────┬─────────┘
//!          ▼                       ▼
//! ┌──────────────────┐   ┌───────────────────┐
//! │GoogleEventSource │   │ StaticEventSource │
//! └────────┬─────────┘   └─────────┬─────────┘
//!          └──── EventSource ──────┘
//!                     │
//!                     ▼
//!            Vec<CalendarEvent>
//! ```

pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod provider;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::{
    BoxFuture, DEFAULT_CALENDAR_ID, ErrorEventSource, EventSource, FetchOptions,
    StaticEventSource,
};
