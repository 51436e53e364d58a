//! Terminal colors and the response-status color policy.

use std::fmt;
use std::str::FromStr;

use owo_colors::{AnsiColors, OwoColorize};
use serde::{Deserialize, Serialize};

use crate::event::ResponseStatus;

/// One of the eight basic ANSI foreground colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// All recognized colors, in ANSI order.
    pub const ALL: [Color; 8] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// Returns the lowercase color name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }

    fn ansi(self) -> AnsiColors {
        match self {
            Self::Black => AnsiColors::Black,
            Self::Red => AnsiColors::Red,
            Self::Green => AnsiColors::Green,
            Self::Yellow => AnsiColors::Yellow,
            Self::Blue => AnsiColors::Blue,
            Self::Magenta => AnsiColors::Magenta,
            Self::Cyan => AnsiColors::Cyan,
            Self::White => AnsiColors::White,
        }
    }

    /// Wraps `text` in this color's escape sequences.
    pub fn paint(self, text: &str) -> String {
        text.color(self.ansi()).to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a color name is not one of [`Color::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color '{}'", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// Maps an attendee response to a title color.
///
/// Used when no highlight rule matched. Statuses missing from the table
/// leave the title uncolored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusColors {
    entries: Vec<(ResponseStatus, Color)>,
}

impl Default for StatusColors {
    fn default() -> Self {
        Self {
            entries: vec![
                (ResponseStatus::Accepted, Color::Green),
                (ResponseStatus::Declined, Color::Red),
            ],
        }
    }
}

impl StatusColors {
    /// Creates an empty table; no status gets a color.
    pub fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder method to set (or replace) the color for a status.
    pub fn with(mut self, status: ResponseStatus, color: Color) -> Self {
        self.entries.retain(|(s, _)| *s != status);
        self.entries.push((status, color));
        self
    }

    /// Returns the color for a status, if any.
    pub fn color_for(&self, status: ResponseStatus) -> Option<Color> {
        self.entries
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, c)| *c)
    }
}
