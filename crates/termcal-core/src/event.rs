//! Event types consumed by the render pipeline.
//!
//! Events arrive from an external source already filtered, expanded and
//! sorted. The start is kept as the provider's raw strings so that a value
//! which fails to parse can still be displayed.

use serde::{Deserialize, Serialize};

/// The response status for an event attendee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The attendee has accepted the invitation.
    Accepted,
    /// The attendee has declined the invitation.
    Declined,
    /// The attendee has tentatively accepted.
    Tentative,
    /// The attendee has not responded.
    NeedsAction,
    /// Unknown response status.
    #[default]
    Unknown,
}

impl ResponseStatus {
    /// Parses a provider response string (`"accepted"`, `"needsAction"`, ...).
    pub fn from_provider(value: &str) -> Self {
        match value {
            "accepted" => Self::Accepted,
            "declined" => Self::Declined,
            "tentative" => Self::Tentative,
            "needsAction" => Self::NeedsAction,
            _ => Self::Unknown,
        }
    }
}

/// An attendee of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// The attendee's email address.
    pub email: String,
    /// The attendee's response status.
    pub response_status: ResponseStatus,
    /// Whether this attendee is the owner of the rendered calendar.
    #[serde(default)]
    pub is_self: bool,
}

impl Attendee {
    /// Creates an attendee with the given email and status.
    pub fn new(email: impl Into<String>, response_status: ResponseStatus) -> Self {
        Self {
            email: email.into(),
            response_status,
            is_self: false,
        }
    }

    /// Builder method to mark the attendee as the calendar owner.
    pub fn as_self(mut self) -> Self {
        self.is_self = true;
        self
    }
}

/// The raw start of an event.
///
/// Timed events carry an RFC 3339 `date_time`, all-day events a
/// `YYYY-MM-DD` `date`. At most one of them is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStart {
    /// RFC 3339 timestamp with offset.
    pub date_time: Option<String>,
    /// Calendar date for all-day events.
    pub date: Option<String>,
}

impl EventStart {
    /// Creates a timed start.
    pub fn timed(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
        }
    }

    /// Creates an all-day start.
    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date_time: None,
            date: Some(date.into()),
        }
    }

    /// Returns true when there is no timed start.
    pub fn is_all_day(&self) -> bool {
        self.date_time.as_deref().is_none_or(str::is_empty)
    }

    /// Returns the raw string the formatter should parse.
    pub fn raw(&self) -> &str {
        if self.is_all_day() {
            self.date.as_deref().unwrap_or_default()
        } else {
            self.date_time.as_deref().unwrap_or_default()
        }
    }
}

/// A calendar event as handed to the render pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// The event title.
    pub title: String,
    /// When the event starts.
    pub start: EventStart,
    /// The event attendees.
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

impl CalendarEvent {
    /// Creates an event with no attendees.
    pub fn new(title: impl Into<String>, start: EventStart) -> Self {
        Self {
            title: title.into(),
            start,
            attendees: Vec::new(),
        }
    }

    /// Builder method to add an attendee.
    pub fn with_attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// Returns the calendar owner's response, or `NeedsAction` when the
    /// owner is not on the attendee list.
    pub fn self_response(&self) -> ResponseStatus {
        self.attendees
            .iter()
            .rev()
            .find(|a| a.is_self)
            .map(|a| a.response_status)
            .unwrap_or(ResponseStatus::NeedsAction)
    }
}
