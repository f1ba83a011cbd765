//! Core library for text-extraction training payloads.
//!
//! This crate provides:
//! - Annotation encoding: text plus expected field values into a
//!   single-line JSON training record with character-offset spans
//! - Prediction decoding: best-scoring span per field from extraction results
//! - Field matchers (exact, normalized, numeric, date) behind one trait
//! - Payload sinks and dataset export with an import manifest

pub mod codec;
pub mod dataset;
pub mod error;
pub mod matchers;
pub mod models;
pub mod sink;
pub mod text;

pub use codec::{AnnotationCodec, EncodeReport};
pub use dataset::{DatasetBuilder, DatasetDocument, DatasetSplit, ImportManifest, SplitPlan};
pub use error::{AnnotexError, CodecError, Result};
pub use matchers::{FieldMatch, FieldMatcher, MatcherKind, MatcherSet};
pub use models::annotation::{Annotation, AnnotationRecord, ExtractionResult};
pub use models::config::AnnotexConfig;
pub use models::value::{ExpectedValue, ExpectedValues};
pub use sink::{DirectorySink, MemorySink, PayloadSink};
