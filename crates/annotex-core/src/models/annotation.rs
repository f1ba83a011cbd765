//! Training record and prediction payload models.
//!
//! Field order in these structs is the field order on the wire.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CodecError;
use crate::text::char_slice;

/// A training record: one text snippet and its labeled spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Labeled spans, in the order the fields were processed.
    pub annotations: Vec<Annotation>,

    /// The (quote-stripped) text the offsets refer to.
    pub text_snippet: TextSnippet,
}

/// One labeled span within a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Span location.
    pub text_extraction: AnnotatedSegment,

    /// Field name (the label).
    pub display_name: String,
}

/// Wrapper matching the `text_extraction` object of a training record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSegment {
    pub text_segment: TextSegment,
}

/// Character span `[start_offset, end_offset)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    /// Exclusive end offset.
    #[serde(deserialize_with = "offset_from_json")]
    pub end_offset: usize,

    /// Inclusive start offset.
    #[serde(deserialize_with = "offset_from_json")]
    pub start_offset: usize,

    /// Span text, as echoed back by some prediction payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Snippet text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSnippet {
    pub content: String,
}

impl TextSegment {
    pub fn new(start_offset: usize, end_offset: usize) -> Self {
        Self {
            end_offset,
            start_offset,
            content: None,
        }
    }
}

impl Annotation {
    /// Create an annotation for `field` covering `[start, end)`.
    pub fn new(field: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text_extraction: AnnotatedSegment {
                text_segment: TextSegment::new(start, end),
            },
            display_name: field.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.text_extraction.text_segment.start_offset
    }

    pub fn end(&self) -> usize {
        self.text_extraction.text_segment.end_offset
    }
}

impl AnnotationRecord {
    /// Create an empty record over `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            text_snippet: TextSnippet {
                content: content.into(),
            },
        }
    }

    /// Snippet text.
    pub fn content(&self) -> &str {
        &self.text_snippet.content
    }

    /// Text covered by an annotation of this record.
    pub fn span_text(&self, annotation: &Annotation) -> &str {
        char_slice(self.content(), annotation.start(), annotation.end())
    }

    /// Serialize as a single JSON line (no trailing newline).
    ///
    /// Newlines and other control characters in the snippet are escaped,
    /// so the result always fits on one line.
    pub fn to_json_line(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a record previously produced by [`AnnotationRecord::to_json_line`].
    pub fn from_json_line(line: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}

/// One scored span from a text-extraction prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Field name the model assigned.
    pub display_name: String,

    /// Scored span.
    pub text_extraction: ScoredSegment,
}

/// Span plus model confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    /// Confidence score (0.0 - 1.0).
    #[serde(default)]
    pub score: f64,

    pub text_segment: TextSegment,
}

impl ExtractionResult {
    pub fn new(field: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            display_name: field.into(),
            text_extraction: ScoredSegment {
                score,
                text_segment: TextSegment::new(start, end),
            },
        }
    }

    pub fn score(&self) -> f64 {
        self.text_extraction.score
    }

    pub fn start(&self) -> usize {
        self.text_extraction.text_segment.start_offset
    }

    pub fn end(&self) -> usize {
        self.text_extraction.text_segment.end_offset
    }
}

/// Prediction responses either list results directly or wrap them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PredictionFile {
    Bare(Vec<ExtractionResult>),
    Wrapped { payload: Vec<ExtractionResult> },
}

/// Parse a prediction response body into extraction results.
pub fn parse_predictions(json: &str) -> serde_json::Result<Vec<ExtractionResult>> {
    Ok(match serde_json::from_str::<PredictionFile>(json)? {
        PredictionFile::Bare(results) => results,
        PredictionFile::Wrapped { payload } => payload,
    })
}

/// 64-bit integers are commonly rendered as JSON strings in prediction
/// responses; accept both forms.
fn offset_from_json<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Offset {
        Number(usize),
        Text(String),
    }

    match Offset::deserialize(deserializer)? {
        Offset::Number(n) => Ok(n),
        Offset::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
