//! Prediction decoder.

use indexmap::IndexMap;
use tracing::debug;

use crate::models::annotation::ExtractionResult;
use crate::text::char_slice;

/// Highest-scoring prediction for `field`.
///
/// Only a strictly higher score replaces the current best, so the first
/// of several equally scored predictions wins. NaN scores never win.
pub fn best_prediction<'a>(
    results: &'a [ExtractionResult],
    field: &str,
) -> Option<&'a ExtractionResult> {
    let mut best: Option<&ExtractionResult> = None;

    for result in results
        .iter()
        .filter(|r| r.display_name == field && !r.score().is_nan())
    {
        match best {
            Some(current) if result.score() <= current.score() => {}
            _ => best = Some(result),
        }
    }

    best
}

/// Text of the best prediction for `field`, or `None` if nothing was
/// predicted for it.
pub fn decode_field(text: &str, results: &[ExtractionResult], field: &str) -> Option<String> {
    let best = best_prediction(results, field)?;
    debug!(
        "Best {} prediction at {}..{} (score {:.3})",
        field,
        best.start(),
        best.end(),
        best.score()
    );
    Some(char_slice(text, best.start(), best.end()).to_string())
}

/// Like [`decode_field`], returning `default` unchanged when absent.
pub fn decode_field_or(
    text: &str,
    results: &[ExtractionResult],
    field: &str,
    default: &str,
) -> String {
    decode_field(text, results, field).unwrap_or_else(|| default.to_string())
}

/// Best value for every predicted field, in order of first appearance.
pub fn decode_all(text: &str, results: &[ExtractionResult]) -> IndexMap<String, String> {
    let mut values = IndexMap::new();
    for result in results {
        if values.contains_key(&result.display_name) {
            continue;
        }
        if let Some(value) = decode_field(text, results, &result.display_name) {
            values.insert(result.display_name.clone(), value);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::AnnotationCodec;
    use crate::matchers::{FieldMatch, MatcherSet};
    use crate::models::value::{ExpectedValue, ExpectedValues};

    #[test]
    fn test_highest_score_wins() {
        let results = vec![
            ExtractionResult::new("make", 0, 4, 0.6),
            ExtractionResult::new("make", 5, 10, 0.9),
        ];

        assert_eq!(decode_field_or("Ford Tesla", &results, "make", "None"), "Tesla");
    }

    #[test]
    fn test_default_returned_unchanged() {
        let results = vec![ExtractionResult::new("make", 0, 4, 0.6)];

        assert_eq!(decode_field_or("Ford Tesla", &results, "model", "None"), "None");
        assert_eq!(decode_field_or("Ford Tesla", &results, "model", ""), "");
        assert_eq!(decode_field("Ford Tesla", &results, "model"), None);
    }

    #[test]
    fn test_tie_keeps_first() {
        let results = vec![
            ExtractionResult::new("make", 0, 4, 0.8),
            ExtractionResult::new("make", 5, 10, 0.8),
        ];

        assert_eq!(decode_field("Ford Tesla", &results, "make").as_deref(), Some("Ford"));
    }

    #[test]
    fn test_nan_score_ignored() {
        let results = vec![
            ExtractionResult::new("make", 0, 4, f64::NAN),
            ExtractionResult::new("make", 5, 10, 0.1),
        ];

        assert_eq!(decode_field("Ford Tesla", &results, "make").as_deref(), Some("Tesla"));
    }

    #[test]
    fn test_zero_score_still_counts() {
        let results = vec![ExtractionResult::new("make", 0, 4, 0.0)];
        assert_eq!(decode_field("Ford", &results, "make").as_deref(), Some("Ford"));
    }

    #[test]
    fn test_offsets_clamped() {
        let results = vec![ExtractionResult::new("make", 5, 50, 0.9)];
        assert_eq!(decode_field("Ford Tesla", &results, "make").as_deref(), Some("Tesla"));
    }

    #[test]
    fn test_decode_all_first_seen_order() {
        let results = vec![
            ExtractionResult::new("model", 5, 10, 0.4),
            ExtractionResult::new("make", 0, 4, 0.7),
            ExtractionResult::new("model", 11, 13, 0.8),
        ];

        let values = decode_all("Ford Focus ST", &results);
        let pairs: Vec<(&str, &str)> = values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("model", "ST"), ("make", "Ford")]);
    }

    #[test]
    fn test_encode_then_decode_round_trip() {
        let codec = AnnotationCodec::new();
        let matchers = MatcherSet::new().with("make", |_: &str, _: &ExpectedValue| {
            Some(FieldMatch::new(5, "Ford"))
        });
        let mut expected = ExpectedValues::new();
        expected.insert("make".to_string(), ExpectedValue::from("Ford"));

        let record = codec.encode("Used Ford", &expected, &matchers).unwrap();
        let annotation = &record.annotations[0];
        let results = vec![ExtractionResult::new(
            annotation.display_name.clone(),
            annotation.start(),
            annotation.end(),
            0.99,
        )];

        assert_eq!(
            codec.decode_field(record.content(), &results, "make").as_deref(),
            Some("Ford")
        );
    }
}
