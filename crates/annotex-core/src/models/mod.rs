//! Data models for annotex.

pub mod annotation;
pub mod config;
pub mod value;

pub use annotation::{
    parse_predictions, AnnotatedSegment, Annotation, AnnotationRecord, ExtractionResult,
    ScoredSegment, TextSegment, TextSnippet,
};
pub use config::{AnnotexConfig, DatasetConfig, DecodeConfig, MatcherConfig};
pub use value::{ExpectedValue, ExpectedValues};
