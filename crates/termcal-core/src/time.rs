//! Timezone-aware date display and relative-time labels.
//!
//! [`format_start`] turns an event start into the displayed date and a short
//! label such as `"Now"`, `"45m"`, `"3h"` or `"2d"`. The reference instant is
//! supplied by the caller so a whole render pass shares the same "now".

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{RenderError, RenderResult};
use crate::event::EventStart;

/// Display format for timed events, e.g. `Wed, Feb 05, 10:45`.
pub const TIMED_FORMAT: &str = "%a, %b %d, %H:%M";

/// Display format for all-day events, e.g. `Wed, Feb 05,`.
pub const ALL_DAY_FORMAT: &str = "%a, %b %d,";

/// Label for events whose start is already in the past.
pub const NOW_LABEL: &str = "Now";

const MINUTE_MS: i64 = 60_000;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Resolves an IANA timezone name.
pub fn resolve_timezone(name: &str) -> RenderResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| RenderError::invalid_timezone(name))
}

/// The date and relative label shown for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTime {
    /// The formatted start date, or the raw value if it did not parse.
    pub date: String,
    /// The relative label; `None` when the start did not parse.
    pub label: Option<String>,
}

/// Formats an event start in `tz` relative to `now`.
///
/// Parse failures are not errors: the raw string is kept as the date and no
/// label is produced.
pub fn format_start(start: &EventStart, tz: &Tz, now: DateTime<Utc>) -> DisplayTime {
    let raw = start.raw();
    let (parsed, format) = if start.is_all_day() {
        (parse_all_day(raw, tz), ALL_DAY_FORMAT)
    } else {
        (parse_timed(raw, tz), TIMED_FORMAT)
    };

    match parsed {
        Some(local) => DisplayTime {
            date: local.format(format).to_string(),
            label: Some(relative_label(&local, now)),
        },
        None => {
            warn!(start = %raw, "unparseable event start, rendering raw value");
            DisplayTime {
                date: raw.to_string(),
                label: None,
            }
        }
    }
}

fn parse_timed(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(tz))
}

fn parse_all_day(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    // Midnight can fall inside a DST gap; take the first instant after it.
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
}

/// Computes the relative label for a localized start.
///
/// - negative remaining time → `"Now"`
/// - same local calendar date as `now` → hours or minutes
/// - at least 24 elapsed hours → whole days (`"2d"`)
/// - otherwise → hours or minutes
///
/// Days come from elapsed hours, not calendar arithmetic, so a DST change
/// can shift the count by one.
pub fn relative_label(start: &DateTime<Tz>, now: DateTime<Utc>) -> String {
    let remaining = round_to_minutes(start.with_timezone(&Utc) - now);
    if remaining < 0 {
        return NOW_LABEL.to_string();
    }

    let today = now.with_timezone(&start.timezone());
    if same_date(start, &today) {
        return short_hand(remaining);
    }

    let days = remaining / MINUTES_PER_DAY;
    if days > 0 {
        format!("{days}d")
    } else {
        short_hand(remaining)
    }
}

/// Formats whole minutes as `"{h}h"` when at least an hour, else `"{m}m"`.
pub fn short_hand(minutes: i64) -> String {
    if minutes >= 60 {
        format!("{}h", minutes / 60)
    } else {
        format!("{minutes}m")
    }
}

/// Rounds a duration to the nearest minute, halves away from zero.
pub fn round_to_minutes(delta: Duration) -> i64 {
    let ms = delta.num_milliseconds();
    let half = MINUTE_MS / 2;
    if ms >= 0 {
        (ms + half) / MINUTE_MS
    } else {
        -((-ms + half) / MINUTE_MS)
    }
}

fn same_date<A: TimeZone, B: TimeZone>(a: &DateTime<A>, b: &DateTime<B>) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn tz(name: &str) -> Tz {
        resolve_timezone(name).unwrap()
    }

    fn label_for(start: DateTime<Utc>, now: DateTime<Utc>, zone: &str) -> String {
        relative_label(&start.with_timezone(&tz(zone)), now)
    }

    mod timezone {
        use super::*;

        #[test]
        fn resolves_iana_names() {
            assert_eq!(tz("Europe/Paris").name(), "Europe/Paris");
            assert_eq!(tz("UTC").name(), "UTC");
        }

        #[test]
        fn rejects_unknown_names() {
            let err = resolve_timezone("Mars/Olympus_Mons").unwrap_err();
            assert!(matches!(err, RenderError::InvalidTimezone { .. }));
            assert!(resolve_timezone("").is_err());
        }
    }

    mod rounding {
        use super::*;

        #[test]
        fn rounds_to_nearest_minute() {
            assert_eq!(round_to_minutes(Duration::seconds(89)), 1);
            assert_eq!(round_to_minutes(Duration::seconds(90)), 2);
            assert_eq!(round_to_minutes(Duration::seconds(29)), 0);
            assert_eq!(round_to_minutes(Duration::seconds(-29)), 0);
            assert_eq!(round_to_minutes(Duration::seconds(-30)), -1);
            assert_eq!(round_to_minutes(Duration::minutes(-5)), -5);
        }

        #[test]
        fn short_hand_never_mixes_units() {
            assert_eq!(short_hand(0), "0m");
            assert_eq!(short_hand(45), "45m");
            assert_eq!(short_hand(59), "59m");
            assert_eq!(short_hand(60), "1h");
            assert_eq!(short_hand(179), "2h");
            assert_eq!(short_hand(60 * 30), "30h");
        }
    }

    mod labels {
        use super::*;

        #[test]
        fn past_start_is_now() {
            let now = utc(2025, 2, 5, 15, 0, 0);
            for zone in ["UTC", "America/New_York", "Asia/Tokyo", "Pacific/Kiritimati"] {
                assert_eq!(label_for(now - Duration::minutes(5), now, zone), "Now");
                assert_eq!(label_for(now - Duration::days(3), now, zone), "Now");
            }
        }

        #[test]
        fn sub_minute_past_rounds_to_zero() {
            let now = utc(2025, 2, 5, 15, 0, 0);
            assert_eq!(label_for(now - Duration::seconds(20), now, "UTC"), "0m");
        }

        #[test]
        fn same_day_minutes_and_hours() {
            let now = utc(2025, 2, 5, 10, 0, 0);
            assert_eq!(label_for(now + Duration::minutes(45), now, "UTC"), "45m");
            assert_eq!(label_for(now + Duration::minutes(150), now, "UTC"), "2h");
            assert_eq!(label_for(now + Duration::minutes(13 * 60 + 59), now, "UTC"), "13h");
        }

        #[test]
        fn later_days() {
            let now = utc(2025, 2, 5, 10, 0, 0);
            assert_eq!(label_for(now + Duration::hours(50), now, "UTC"), "2d");
            assert_eq!(label_for(now + Duration::hours(24), now, "UTC"), "1d");
            assert_eq!(label_for(now + Duration::hours(71), now, "UTC"), "2d");
        }

        #[test]
        fn tomorrow_within_a_day_uses_short_hand() {
            // 23:00 today → 09:00 tomorrow is a different date but under 24h.
            let now = utc(2025, 2, 5, 23, 0, 0);
            assert_eq!(label_for(now + Duration::hours(10), now, "UTC"), "10h");
            assert_eq!(label_for(now + Duration::minutes(90), now, "UTC"), "1h");
        }

        #[test]
        fn date_comparison_uses_request_timezone() {
            // 03:00 UTC is still the previous evening in New York.
            let now = utc(2025, 2, 6, 3, 0, 0);
            let start = utc(2025, 2, 6, 4, 30, 0);
            assert_eq!(label_for(start, now, "America/New_York"), "1h");
            assert_eq!(label_for(start, now, "UTC"), "1h");

            let now = utc(2025, 2, 6, 4, 0, 0); // 23:00 in New York
            let start = utc(2025, 2, 8, 5, 0, 0); // 49h later
            assert_eq!(label_for(start, now, "America/New_York"), "2d");
        }

        #[test]
        fn day_count_follows_elapsed_hours_across_dst() {
            // US spring forward on 2025-03-09: midnight Mar 8 to midnight Mar 10
            // in New York is only 47 elapsed hours.
            let zone = tz("America/New_York");
            let now = zone
                .with_ymd_and_hms(2025, 3, 8, 0, 0, 0)
                .unwrap()
                .with_timezone(&Utc);
            let start = zone.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
            assert_eq!(relative_label(&start, now), "1d");
        }
    }

    mod formatting {
        use super::*;

        #[test]
        fn timed_event_in_timezone() {
            let now = utc(2025, 2, 5, 10, 0, 0);
            let start = EventStart::timed("2025-02-05T10:45:00Z");

            let shown = format_start(&start, &tz("UTC"), now);
            assert_eq!(shown.date, "Wed, Feb 05, 10:45");
            assert_eq!(shown.label.as_deref(), Some("45m"));

            let shown = format_start(&start, &tz("Europe/Paris"), now);
            assert_eq!(shown.date, "Wed, Feb 05, 11:45");
            assert_eq!(shown.label.as_deref(), Some("45m"));
        }

        #[test]
        fn timed_event_with_offset() {
            let now = utc(2025, 2, 5, 10, 0, 0);
            let start = EventStart::timed("2025-02-05T08:30:00-05:00");
            let shown = format_start(&start, &tz("America/New_York"), now);
            assert_eq!(shown.date, "Wed, Feb 05, 08:30");
            assert_eq!(shown.label.as_deref(), Some("3h"));
        }

        #[test]
        fn all_day_event_is_local_midnight() {
            let now = utc(2025, 2, 5, 15, 0, 0); // 10:00 in New York
            let zone = tz("America/New_York");

            let today = format_start(&EventStart::all_day("2025-02-05"), &zone, now);
            assert_eq!(today.date, "Wed, Feb 05,");
            assert_eq!(today.label.as_deref(), Some("Now"));

            let later = format_start(&EventStart::all_day("2025-02-08"), &zone, now);
            assert_eq!(later.date, "Sat, Feb 08,");
            assert_eq!(later.label.as_deref(), Some("2d"));
        }

        #[test]
        fn unparseable_start_keeps_raw_value() {
            let now = utc(2025, 2, 5, 10, 0, 0);

            let shown = format_start(&EventStart::timed("tomorrow-ish"), &tz("UTC"), now);
            assert_eq!(shown.date, "tomorrow-ish");
            assert!(shown.label.is_none());

            let shown = format_start(&EventStart::all_day("2025-13-45"), &tz("UTC"), now);
            assert_eq!(shown.date, "2025-13-45");
            assert!(shown.label.is_none());
        }
    }
}
