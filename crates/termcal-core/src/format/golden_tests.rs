//! Golden tests for agenda output.
//!
//! Coloring is disabled so snapshots stay readable. Trailing blank lines are
//! trimmed before comparison; record separators are covered in `mod.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::event::{Attendee, CalendarEvent, EventStart, ResponseStatus};
use crate::format::render;
use crate::request::RenderRequest;

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// 2025-02-05 10:00:00 UTC, a Wednesday.
fn reference_time() -> DateTime<Utc> {
    utc(2025, 2, 5, 10, 0, 0)
}

fn timed_in(now: DateTime<Utc>, offset: Duration, title: &str) -> CalendarEvent {
    CalendarEvent::new(title, EventStart::timed((now + offset).to_rfc3339()))
}

fn plain_request(time_zone: &str) -> RenderRequest {
    RenderRequest::new("golden-user")
        .with_time_zone(time_zone)
        .with_color(false)
}

fn render_plain(events: &[CalendarEvent], request: RenderRequest) -> String {
    let mut request = request;
    request.prepare().unwrap();
    render(events, &request, reference_time())
        .unwrap()
        .trim_end()
        .to_string()
}

#[test]
fn golden_no_events() {
    let output = render_plain(&[], plain_request("UTC"));
    insta::assert_snapshot!(output, @"No upcoming events found.");
}

#[test]
fn golden_single_standup() {
    let now = reference_time();
    let events = vec![timed_in(now, Duration::minutes(45), "Standup")];

    let output = render_plain(&events, plain_request("UTC"));

    insta::assert_snapshot!(output, @r"
    Standup
    Wed, Feb 05, 10:45 45m
    ");
}

#[test]
fn golden_two_days_out() {
    let now = reference_time();
    let events = vec![timed_in(now, Duration::hours(50), "Offsite")];

    let output = render_plain(&events, plain_request("UTC"));

    insta::assert_snapshot!(output, @r"
    Offsite
    Fri, Feb 07, 12:00 2d
    ");
}

#[test]
fn golden_only_event_excluded() {
    let now = reference_time();
    let events = vec![timed_in(now, Duration::hours(2), "Lunch with Bob")];

    let output = render_plain(&events, plain_request("UTC").with_exclude("^Lunch"));

    assert_eq!(output, "");
}

#[test]
fn golden_mixed_agenda_new_york() {
    let now = reference_time();
    let events = vec![
        timed_in(now, -Duration::minutes(10), "Incident review"),
        timed_in(now, Duration::minutes(90), "1:1 with Alex")
            .with_attendee(Attendee::new("me@example.com", ResponseStatus::Accepted).as_self()),
        CalendarEvent::new("Company holiday", EventStart::all_day("2025-02-07")),
        timed_in(now, Duration::hours(26), "Lunch and learn"),
    ];

    let output = render_plain(
        &events,
        plain_request("America/New_York")
            .with_exclude("^Lunch")
            .with_highlights("1:1,magenta"),
    );

    insta::assert_snapshot!(output, @r"
    Incident review
    Wed, Feb 05, 04:50 Now

    1:1 with Alex
    Wed, Feb 05, 06:30 1h

    Company holiday
    Fri, Feb 07, 1d
    ");
}

#[test]
fn golden_all_day_excluded() {
    let now = reference_time();
    let events = vec![
        CalendarEvent::new("Company holiday", EventStart::all_day("2025-02-07")),
        timed_in(now, Duration::minutes(20), "Design sync"),
    ];

    let output = render_plain(&events, plain_request("UTC").with_all_day(false));

    insta::assert_snapshot!(output, @r"
    Design sync
    Wed, Feb 05, 10:20 20m
    ");
}

#[test]
fn golden_wrapped_title() {
    let now = reference_time();
    let events = vec![timed_in(
        now,
        Duration::hours(3),
        "Architecture review for the calendar rendering service rollout",
    )];

    let output = render_plain(&events, plain_request("UTC").with_max_width(24));

    insta::assert_snapshot!(output, @r"
    Architecture review for
    the calendar rendering
    service rollout
    Wed, Feb 05, 13:00 3h
    ");
}

#[test]
fn golden_unparseable_start() {
    let events = vec![
        CalendarEvent::new("Mystery meeting", EventStart::timed("next tuesday")),
        CalendarEvent::new("Broken all-day", EventStart::all_day("2025-02-31")),
    ];

    let output = render_plain(&events, plain_request("UTC"));

    insta::assert_snapshot!(output, @r"
    Mystery meeting
    next tuesday

    Broken all-day
    2025-02-31
    ");
}
