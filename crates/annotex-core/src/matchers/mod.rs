//! Field matchers: locate an expected value inside a text.

pub mod dates;
pub mod exact;
pub mod normalized;
pub mod numeric;
pub mod patterns;

pub use dates::{parse_date, DateMatcher};
pub use exact::ExactMatcher;
pub use normalized::NormalizedMatcher;
pub use numeric::{parse_amount, NumericMatcher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::value::ExpectedValue;
use crate::text::{byte_to_char, char_len};

/// A located value: character offset plus the text found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// Character offset of the first matched character.
    pub start: usize,
    /// Matched text, as it appears in the searched text.
    pub text: String,
}

impl FieldMatch {
    pub fn new(start: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }

    /// Build a match from a byte range of `haystack`.
    pub fn from_bytes(haystack: &str, start: usize, end: usize) -> Self {
        Self {
            start: byte_to_char(haystack, start),
            text: haystack[start..end].to_string(),
        }
    }

    /// Exclusive character end offset.
    pub fn end(&self) -> usize {
        self.start + char_len(&self.text)
    }
}

/// Strategy that finds where an expected value occurs in a text.
///
/// `None` is the only "not found" signal.
pub trait FieldMatcher: Send + Sync {
    fn find_match(&self, text: &str, expected: &ExpectedValue) -> Option<FieldMatch>;
}

impl<F> FieldMatcher for F
where
    F: Fn(&str, &ExpectedValue) -> Option<FieldMatch> + Send + Sync,
{
    fn find_match(&self, text: &str, expected: &ExpectedValue) -> Option<FieldMatch> {
        self(text, expected)
    }
}

/// Built-in matcher variants, as named in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Literal substring search.
    Exact,
    /// Case- and whitespace-insensitive search.
    Normalized,
    /// Numeric value search across number formats.
    Numeric,
    /// Calendar date search across date formats.
    Date,
}

impl MatcherKind {
    /// Instantiate the matcher.
    pub fn build(self) -> Box<dyn FieldMatcher> {
        match self {
            Self::Exact => Box::new(ExactMatcher::new()),
            Self::Normalized => Box::new(NormalizedMatcher::new()),
            Self::Numeric => Box::new(NumericMatcher::new()),
            Self::Date => Box::new(DateMatcher::new()),
        }
    }
}

impl std::str::FromStr for MatcherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "normalized" => Ok(Self::Normalized),
            "numeric" => Ok(Self::Numeric),
            "date" => Ok(Self::Date),
            other => Err(format!("unknown matcher kind: {}", other)),
        }
    }
}

/// Matchers keyed by field name.
#[derive(Default)]
pub struct MatcherSet {
    matchers: IndexMap<String, Box<dyn FieldMatcher>>,
}

impl MatcherSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `matcher` for `field`, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, matcher: Box<dyn FieldMatcher>) {
        self.matchers.insert(field.into(), matcher);
    }

    /// Builder form of [`MatcherSet::insert`].
    pub fn with(mut self, field: impl Into<String>, matcher: impl FieldMatcher + 'static) -> Self {
        self.insert(field, Box::new(matcher));
        self
    }

    /// Builder form taking a built-in kind.
    pub fn with_kind(mut self, field: impl Into<String>, kind: MatcherKind) -> Self {
        self.insert(field, kind.build());
        self
    }

    pub fn get(&self, field: &str) -> Option<&dyn FieldMatcher> {
        self.matchers.get(field).map(|m| m.as_ref())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.matchers.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Registered field names, in registration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.matchers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for MatcherSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherSet")
            .field("fields", &self.matchers.keys().collect::<Vec<_>>())
            .finish()
    }
}
