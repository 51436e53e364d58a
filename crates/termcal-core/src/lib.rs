//! Core types: render requests, rules, time labels, credentials, rendering

pub mod color;
pub mod credential;
pub mod error;
pub mod event;
pub mod format;
pub mod request;
pub mod rules;
pub mod time;
pub mod tracing;

pub use color::{Color, StatusColors, UnknownColor};
pub use credential::{CredentialRecord, OAuthToken};
pub use error::{RenderError, RenderResult};
pub use event::{Attendee, CalendarEvent, EventStart, ResponseStatus};
pub use format::{AgendaFormatter, NO_EVENTS_MESSAGE, render, wrap};
pub use request::{
    DEFAULT_MAX_RESULTS, DEFAULT_MAX_WIDTH, DEFAULT_TIME_ZONE, MAX_RESULTS_CAP, RenderRequest,
};
pub use rules::{ExcludeRules, HighlightRule, HighlightRules};
pub use time::{DisplayTime, format_start, relative_label, resolve_timezone};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
