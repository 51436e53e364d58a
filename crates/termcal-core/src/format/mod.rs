//! Agenda rendering.
//!
//! Turns a provider-ordered list of [`CalendarEvent`]s into the text block
//! served to the terminal. Each surviving event becomes one record:
//!
//! ```text
//! <title, wrapped and colored>
//! <date> <relative label>
//!
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use termcal_core::{render, CalendarEvent, EventStart, RenderRequest};
//!
//! let now = Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap();
//! let mut request = RenderRequest::new("user-1")
//!     .with_time_zone("UTC")
//!     .with_color(false);
//! request.prepare().unwrap();
//!
//! let events = vec![CalendarEvent::new(
//!     "Standup",
//!     EventStart::timed("2025-02-05T10:45:00Z"),
//! )];
//! let text = render(&events, &request, now).unwrap();
//! assert_eq!(text, "Standup\nWed, Feb 05, 10:45 45m\n\n");
//! ```

#[cfg(test)]
mod golden_tests;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::color::Color;
use crate::error::RenderResult;
use crate::event::CalendarEvent;
use crate::request::RenderRequest;
use crate::time::{format_start, resolve_timezone};

/// Output when the event source returned nothing at all.
pub const NO_EVENTS_MESSAGE: &str = "No upcoming events found.";

const DATE_COLOR: Color = Color::Cyan;
const LABEL_COLOR: Color = Color::Blue;

/// Renders events for a prepared request.
///
/// `now` is used for every event so all labels in one response agree.
///
/// # Errors
///
/// Fails only if the request timezone does not resolve.
pub fn render(
    events: &[CalendarEvent],
    request: &RenderRequest,
    now: DateTime<Utc>,
) -> RenderResult<String> {
    Ok(AgendaFormatter::new(request)?.format_at(events, now))
}

/// Renders events for one request in its timezone.
#[derive(Debug, Clone)]
pub struct AgendaFormatter<'a> {
    request: &'a RenderRequest,
    tz: Tz,
}

impl<'a> AgendaFormatter<'a> {
    /// Creates a formatter, resolving the request timezone.
    pub fn new(request: &'a RenderRequest) -> RenderResult<Self> {
        let tz = resolve_timezone(&request.time_zone)?;
        Ok(Self { request, tz })
    }

    /// Formats all events at the given instant.
    ///
    /// An empty input yields [`NO_EVENTS_MESSAGE`]; input where every event
    /// is filtered out yields an empty string.
    pub fn format_at(&self, events: &[CalendarEvent], now: DateTime<Utc>) -> String {
        if events.is_empty() {
            return NO_EVENTS_MESSAGE.to_string();
        }

        let mut out = String::new();
        let mut skipped = 0usize;
        for event in events {
            match self.format_event(event, now) {
                Some(record) => out.push_str(&record),
                None => skipped += 1,
            }
        }
        debug!(
            user = %self.request.user_id,
            total = events.len(),
            skipped,
            "rendered agenda"
        );
        out
    }

    /// Formats a single event, or returns `None` if it is filtered out.
    pub fn format_event(&self, event: &CalendarEvent, now: DateTime<Utc>) -> Option<String> {
        if self.request.excludes(&event.title) {
            trace!(title = %event.title, "excluded by rule");
            return None;
        }
        if event.is_all_day() && !self.request.include_all_day {
            trace!(title = %event.title, "all-day event skipped");
            return None;
        }

        let shown = format_start(&event.start, &self.tz, now);
        let title = self
            .request
            .color_title(&wrap(&event.title, self.request.wrap_width()), event.self_response());
        let date = self.request.paint(DATE_COLOR, &shown.date);

        Some(match shown.label {
            Some(label) => format!(
                "{}\n{} {}\n\n",
                title,
                date,
                self.request.paint(LABEL_COLOR, &label)
            ),
            None => format!("{}\n{}\n\n", title, date),
        })
    }
}

/// Wraps text on whitespace so no line exceeds `width` characters.
///
/// Words longer than `width` are kept whole on their own line. Runs of
/// whitespace collapse to a single space.
pub fn wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}
