//! Row filtering over a published list
//!
//! A `FilterBehavior` names one field role and a pattern. Patterns are
//! case-insensitive regular expressions tried against the normalized field
//! text, so "beyonce" finds "Beyoncé". `contains`, `starts_with` and `exact`
//! build escaped expressions from literal text.

use list_sync::normalize::normalized_string;
use list_sync::{ContentItem, FieldKey, FieldValue, Record, SyncController};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// How the pattern source is turned into an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMode {
    #[default]
    Contains,
    StartsWith,
    Exact,
    Regex,
}

/// Compiled filter pattern
///
/// An empty source matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterPattern {
    source: String,
    mode: MatchMode,
    regex: Option<Regex>,
}

impl FilterPattern {
    pub fn new(pattern: &str, mode: MatchMode) -> Result<Self> {
        let expression = match mode {
            MatchMode::Regex => pattern.to_string(),
            MatchMode::Contains => regex::escape(&normalized_string(pattern)),
            MatchMode::StartsWith => format!("^{}", regex::escape(&normalized_string(pattern))),
            MatchMode::Exact => format!("^{}$", regex::escape(&normalized_string(pattern))),
        };

        let regex = if pattern.is_empty() {
            None
        } else {
            let regex = RegexBuilder::new(&expression)
                .case_insensitive(true)
                .build()
                .map_err(|e| ModelError::InvalidPattern(e.to_string()))?;
            Some(regex)
        };

        Ok(Self {
            source: pattern.to_string(),
            mode,
            regex,
        })
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        Self::new(pattern, MatchMode::Regex)
    }

    pub fn contains(pattern: &str) -> Result<Self> {
        Self::new(pattern, MatchMode::Contains)
    }

    pub fn starts_with(pattern: &str) -> Result<Self> {
        Self::new(pattern, MatchMode::StartsWith)
    }

    pub fn exact(pattern: &str) -> Result<Self> {
        Self::new(pattern, MatchMode::Exact)
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn matches_text(&self, text: &str) -> bool {
        let Some(regex) = &self.regex else {
            return true;
        };
        regex.is_match(&normalized_string(text))
            || (self.mode == MatchMode::Regex && regex.is_match(text))
    }

    pub fn matches_value(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Text(text) => self.matches_text(text),
            FieldValue::Number(n) => self.matches_text(&n.to_string()),
            FieldValue::Flag(b) => self.matches_text(if *b { "true" } else { "false" }),
            FieldValue::List(values) => values.iter().any(|v| self.matches_text(v)),
            FieldValue::Payload(_) => false,
        }
    }
}

impl PartialEq for FilterPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.mode == other.mode
    }
}

impl Eq for FilterPattern {}

/// Filter on one field role of a list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterBehavior {
    property: String,
    pattern: FilterPattern,
}

impl FilterBehavior {
    pub fn new(property: impl Into<String>, pattern: FilterPattern) -> Self {
        Self {
            property: property.into(),
            pattern,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn set_property(&mut self, property: impl Into<String>) {
        self.property = property.into();
    }

    pub fn pattern(&self) -> &FilterPattern {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: FilterPattern) {
        self.pattern = pattern;
    }

    fn key(&self) -> Option<FieldKey> {
        FieldKey::from_name(&self.property)
    }

    /// Whether an item passes the filter
    ///
    /// An empty pattern accepts everything; an unknown role or a missing
    /// field rejects.
    pub fn accepts(&self, item: &ContentItem) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        self.key()
            .and_then(|key| item.field(key))
            .is_some_and(|value| self.pattern.matches_value(&value))
    }

    /// Same as `accepts`, on a record read with `row_as_record`
    pub fn accepts_record(&self, record: &Record) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        record
            .get(self.property.as_str())
            .is_some_and(|value| self.pattern.matches_value(value))
    }

    /// Indices of the published rows that pass the filter
    pub fn filtered_rows(&self, controller: &SyncController) -> Vec<usize> {
        controller
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| self.accepts(item))
            .map(|(row, _)| row)
            .collect()
    }
}
