//! Literal substring matching.

use super::{FieldMatch, FieldMatcher};
use crate::models::value::ExpectedValue;

/// Finds the first literal occurrence of the value's text form.
pub struct ExactMatcher;

impl ExactMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExactMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMatcher for ExactMatcher {
    fn find_match(&self, text: &str, expected: &ExpectedValue) -> Option<FieldMatch> {
        let needle = expected.as_text()?;
        if needle.is_empty() {
            return None;
        }

        text.find(&needle)
            .map(|start| FieldMatch::from_bytes(text, start, start + needle.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence() {
        let matcher = ExactMatcher::new();
        let found = matcher.find_match("Ford or Ford", &ExpectedValue::from("Ford"));
        assert_eq!(found, Some(FieldMatch::new(0, "Ford")));
    }

    #[test]
    fn test_number_as_text() {
        let matcher = ExactMatcher::new();
        let found = matcher.find_match("year 2019 model", &ExpectedValue::Number(2019.0));
        assert_eq!(found, Some(FieldMatch::new(5, "2019")));
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = ExactMatcher::new();
        assert_eq!(matcher.find_match("FORD", &ExpectedValue::from("Ford")), None);
    }

    #[test]
    fn test_empty_needle() {
        let matcher = ExactMatcher::new();
        assert_eq!(matcher.find_match("Ford", &ExpectedValue::from("")), None);
    }
}
