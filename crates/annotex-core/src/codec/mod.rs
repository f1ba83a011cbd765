//! Training-record encoding and prediction decoding.

mod decoder;
mod encoder;

pub use decoder::{best_prediction, decode_all, decode_field, decode_field_or};
pub use encoder::EncodeReport;

use indexmap::IndexMap;

use crate::error::CodecError;
use crate::matchers::MatcherSet;
use crate::models::annotation::{AnnotationRecord, ExtractionResult};
use crate::models::value::ExpectedValues;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Converts labeled text into training records and reads field values
/// back out of extraction predictions.
///
/// The codec holds no state; every call is a pure function of its
/// arguments and the matchers it is handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationCodec;

impl AnnotationCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode `text` with the spans where each expected value was found.
    pub fn encode(
        &self,
        text: &str,
        expected: &ExpectedValues,
        matchers: &MatcherSet,
    ) -> Result<AnnotationRecord> {
        self.encode_detailed(text, expected, matchers)
            .map(|report| report.record)
    }

    /// Value of `field` from the best-scoring prediction, if any.
    pub fn decode_field(
        &self,
        text: &str,
        results: &[ExtractionResult],
        field: &str,
    ) -> Option<String> {
        decode_field(text, results, field)
    }

    /// Like [`AnnotationCodec::decode_field`], falling back to `default`.
    pub fn decode_field_or(
        &self,
        text: &str,
        results: &[ExtractionResult],
        field: &str,
        default: &str,
    ) -> String {
        decode_field_or(text, results, field, default)
    }

    /// Best value for every field that has a prediction.
    pub fn decode_all(&self, text: &str, results: &[ExtractionResult]) -> IndexMap<String, String> {
        decode_all(text, results)
    }
}
