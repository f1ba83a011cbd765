//! Case- and whitespace-insensitive matching.

use regex::RegexBuilder;
use tracing::debug;

use super::{FieldMatch, FieldMatcher};
use crate::models::value::ExpectedValue;

/// Finds the value ignoring letter case and treating any run of
/// whitespace (including line breaks) as a single separator.
///
/// `"Model  S"` matches `"model\ns"`. The reported text is the span as
/// written in the searched text.
pub struct NormalizedMatcher;

impl NormalizedMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NormalizedMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMatcher for NormalizedMatcher {
    fn find_match(&self, text: &str, expected: &ExpectedValue) -> Option<FieldMatch> {
        let value = expected.as_text()?;
        let tokens: Vec<String> = value.split_whitespace().map(regex::escape).collect();
        if tokens.is_empty() {
            return None;
        }

        let pattern = match RegexBuilder::new(&tokens.join(r"\s+"))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!("Cannot build pattern for {:?}: {}", value, e);
                return None;
            }
        };

        pattern
            .find(text)
            .map(|m| FieldMatch::from_bytes(text, m.start(), m.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace() {
        let matcher = NormalizedMatcher::new();
        let text = "Vehicle: tesla MODEL\n  s, 2019";

        let found = matcher.find_match(text, &ExpectedValue::from("Tesla Model S"));
        assert_eq!(found, Some(FieldMatch::new(9, "tesla MODEL\n  s")));
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let matcher = NormalizedMatcher::new();
        let found = matcher.find_match("cost (net) $5.00", &ExpectedValue::from("(NET) $5.00"));
        assert_eq!(found, Some(FieldMatch::new(5, "(net) $5.00")));
        assert_eq!(matcher.find_match("5x00", &ExpectedValue::from("5.00")), None);
    }

    #[test]
    fn test_blank_value() {
        let matcher = NormalizedMatcher::new();
        assert_eq!(matcher.find_match("text", &ExpectedValue::from("   ")), None);
    }
}
