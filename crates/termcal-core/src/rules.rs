//! Exclude and highlight rules.
//!
//! Both rule lists are parsed from comma-separated strings. Highlight rules
//! keep their declaration order so the first matching rule always wins.

use regex::Regex;

use crate::color::Color;
use crate::error::{RenderError, RenderResult};

fn compile(pattern: &str) -> RenderResult<Regex> {
    Regex::new(pattern).map_err(|e| RenderError::invalid_pattern(pattern, e))
}

/// Patterns that drop an event when its title matches any of them.
#[derive(Debug, Clone, Default)]
pub struct ExcludeRules {
    patterns: Vec<Regex>,
}

impl ExcludeRules {
    /// Parses a comma-separated list of patterns.
    ///
    /// An empty string yields no rules. Fails on the first pattern that does
    /// not compile.
    pub fn parse(csv: &str) -> RenderResult<Self> {
        if csv.is_empty() {
            return Ok(Self::default());
        }
        let patterns = csv
            .split(',')
            .map(compile)
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the title.
    pub fn excludes(&self, title: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(title))
    }

    /// Returns the number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if there are no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// A single `(pattern, color)` highlight rule.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    pattern: Regex,
    color_name: String,
}

impl HighlightRule {
    /// Returns the color, or `None` if the name is not recognized.
    pub fn color(&self) -> Option<Color> {
        self.color_name.parse().ok()
    }
}

/// Ordered highlight rules forcing a title color.
#[derive(Debug, Clone, Default)]
pub struct HighlightRules {
    rules: Vec<HighlightRule>,
}

impl HighlightRules {
    /// Parses a flat comma-separated list alternating pattern and color.
    ///
    /// Unknown color names are accepted here and ignored when resolving.
    pub fn parse(csv: &str) -> RenderResult<Self> {
        if csv.is_empty() {
            return Ok(Self::default());
        }
        let items: Vec<&str> = csv.split(',').collect();
        if items.len() % 2 != 0 {
            return Err(RenderError::InvalidHighlightFormat { count: items.len() });
        }
        let rules = items
            .chunks_exact(2)
            .map(|pair| -> RenderResult<HighlightRule> {
                Ok(HighlightRule {
                    pattern: compile(pair[0])?,
                    color_name: pair[1].to_string(),
                })
            })
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Returns the color of the first rule that has a recognized color and
    /// whose pattern matches `text`.
    pub fn resolve(&self, text: &str) -> Option<Color> {
        self.rules
            .iter()
            .filter_map(|rule| rule.color().map(|color| (rule, color)))
            .find(|(rule, _)| rule.pattern.is_match(text))
            .map(|(_, color)| color)
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
