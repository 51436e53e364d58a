//! Per-invocation render request.
//!
//! A [`RenderRequest`] is built from user options merged with defaults,
//! validated once with [`RenderRequest::prepare`], and then only read.

use std::fmt;

use crate::color::{Color, StatusColors};
use crate::error::{RenderError, RenderResult};
use crate::event::ResponseStatus;
use crate::rules::{ExcludeRules, HighlightRules};

/// Upper bound on the number of events considered.
pub const MAX_RESULTS_CAP: i64 = 50;

/// Wrap width used when none is supplied.
pub const DEFAULT_MAX_WIDTH: i64 = 50;

/// Default number of events requested.
pub const DEFAULT_MAX_RESULTS: i64 = 10;

/// Default timezone for rendering.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// Options for rendering one user's agenda.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Opaque user identifier.
    pub user_id: String,
    /// Maximum number of events considered. Capped at 50 by `prepare`.
    pub max_results: i64,
    /// IANA timezone name.
    pub time_zone: String,
    /// Whether all-day events are rendered.
    pub include_all_day: bool,
    /// Raw highlight list: `pattern,color,pattern,color,...`.
    pub highlights: String,
    /// Raw exclude list: `pattern,pattern,...`.
    pub exclude: String,
    /// Word-wrap column. Zero means "use the default".
    pub max_width: i64,
    /// Global color toggle.
    pub color_enabled: bool,
    /// Fallback title colors by response status.
    pub status_colors: StatusColors,

    exclude_rules: ExcludeRules,
    highlight_rules: HighlightRules,
}

impl RenderRequest {
    /// Creates a request for `user_id` with default options.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            max_results: DEFAULT_MAX_RESULTS,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            include_all_day: true,
            highlights: String::new(),
            exclude: String::new(),
            max_width: 0,
            color_enabled: true,
            status_colors: StatusColors::default(),
            exclude_rules: ExcludeRules::default(),
            highlight_rules: HighlightRules::default(),
        }
    }

    /// Builder: set the maximum number of results.
    #[must_use]
    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }

    /// Builder: set the timezone.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Builder: include or skip all-day events.
    #[must_use]
    pub fn with_all_day(mut self, include_all_day: bool) -> Self {
        self.include_all_day = include_all_day;
        self
    }

    /// Builder: set the raw highlight list.
    #[must_use]
    pub fn with_highlights(mut self, highlights: impl Into<String>) -> Self {
        self.highlights = highlights.into();
        self
    }

    /// Builder: set the raw exclude list.
    #[must_use]
    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = exclude.into();
        self
    }

    /// Builder: set the wrap width.
    #[must_use]
    pub fn with_max_width(mut self, max_width: i64) -> Self {
        self.max_width = max_width;
        self
    }

    /// Builder: enable or disable coloring.
    #[must_use]
    pub fn with_color(mut self, color_enabled: bool) -> Self {
        self.color_enabled = color_enabled;
        self
    }

    /// Builder: replace the status color table.
    #[must_use]
    pub fn with_status_colors(mut self, status_colors: StatusColors) -> Self {
        self.status_colors = status_colors;
        self
    }

    /// Validates and normalizes the request in place.
    ///
    /// - the user id must be non-empty
    /// - `max_results` is capped at 50; values `<= 0` pass through
    /// - `max_width` becomes 50 only when it is exactly zero; negative
    ///   widths are rejected
    /// - exclude and highlight lists are compiled
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; compiled rules are only
    /// replaced once both lists parsed.
    pub fn prepare(&mut self) -> RenderResult<()> {
        if self.user_id.is_empty() {
            return Err(RenderError::invalid_request("empty user id"));
        }
        if self.max_results > MAX_RESULTS_CAP {
            self.max_results = MAX_RESULTS_CAP;
        }
        if self.max_width == 0 {
            self.max_width = DEFAULT_MAX_WIDTH;
        } else if self.max_width < 0 {
            return Err(RenderError::invalid_request(format!(
                "width must be positive (got {})",
                self.max_width
            )));
        }

        let exclude_rules = ExcludeRules::parse(&self.exclude)?;
        let highlight_rules = HighlightRules::parse(&self.highlights)?;
        self.exclude_rules = exclude_rules;
        self.highlight_rules = highlight_rules;
        Ok(())
    }

    /// Returns the compiled exclude rules.
    pub fn exclude_rules(&self) -> &ExcludeRules {
        &self.exclude_rules
    }

    /// Returns the compiled highlight rules.
    pub fn highlight_rules(&self) -> &HighlightRules {
        &self.highlight_rules
    }

    /// Returns the wrap width as a column count.
    pub fn wrap_width(&self) -> usize {
        usize::try_from(self.max_width)
            .ok()
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_MAX_WIDTH as usize)
    }

    /// Returns true if the event title is dropped by an exclude rule.
    pub fn excludes(&self, title: &str) -> bool {
        self.exclude_rules.excludes(title)
    }

    /// Colors a (wrapped) title.
    ///
    /// Highlight rules are tried first in declaration order; without a match
    /// the attendee response picks the color from the status table. With
    /// coloring disabled the title is returned unchanged.
    pub fn color_title(&self, title: &str, response: ResponseStatus) -> String {
        if !self.color_enabled {
            return title.to_string();
        }
        match self
            .highlight_rules
            .resolve(title)
            .or_else(|| self.status_colors.color_for(response))
        {
            Some(color) => color.paint(title),
            None => title.to_string(),
        }
    }

    /// Colors arbitrary text, respecting the global toggle.
    pub fn paint(&self, color: Color, text: &str) -> String {
        if self.color_enabled {
            color.paint(text)
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for RenderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) max: {}", self.user_id, self.max_results)
    }
}
