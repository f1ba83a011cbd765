//! Error types for the annotex-core library.

use thiserror::Error;

/// Main error type for the annotex library.
#[derive(Error, Debug)]
pub enum AnnotexError {
    /// Annotation encoding error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// JSON (de)serialization error outside the codec.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest rendering error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while encoding an annotation record.
///
/// Every variant aborts the whole record: nothing is emitted for a
/// document once one of these is returned.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A field has an expected value but no matcher to locate it.
    #[error("no matcher registered for field {field:?}")]
    MissingMatcher { field: String },

    /// A matcher returned a span that does not fit inside the snippet.
    #[error("span {start}..{end} for field {field:?} is outside the snippet (length {len})")]
    InvalidSpan {
        field: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// The record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for the annotex library.
pub type Result<T> = std::result::Result<T, AnnotexError>;
