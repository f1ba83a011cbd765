//! Training-record encoder.

use tracing::{debug, info};

use super::{AnnotationCodec, Result};
use crate::error::CodecError;
use crate::matchers::MatcherSet;
use crate::models::annotation::{Annotation, AnnotationRecord};
use crate::models::value::ExpectedValues;
use crate::text::{char_len, strip_quotes};

/// Encoded record plus what happened to each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeReport {
    /// The training record.
    pub record: AnnotationRecord,
    /// Fields whose value was searched for but not found.
    pub unmatched: Vec<String>,
    /// Fields skipped because their value is unknown.
    pub skipped: Vec<String>,
}

impl EncodeReport {
    /// Number of fields that produced an annotation.
    pub fn matched(&self) -> usize {
        self.record.annotations.len()
    }
}

impl AnnotationCodec {
    /// Encode `text`, reporting unmatched and skipped fields.
    ///
    /// Double quotes are removed from the text before matching, so the
    /// snippet and every offset refer to the stripped text. Fields are
    /// processed in the iteration order of `expected`.
    pub fn encode_detailed(
        &self,
        text: &str,
        expected: &ExpectedValues,
        matchers: &MatcherSet,
    ) -> Result<EncodeReport> {
        let content = strip_quotes(text);
        let len = char_len(&content);

        info!(
            "Encoding {} characters with {} expected fields",
            len,
            expected.len()
        );

        let mut annotations = Vec::new();
        let mut unmatched = Vec::new();
        let mut skipped = Vec::new();

        for (field, value) in expected {
            if value.is_unknown() {
                skipped.push(field.clone());
                continue;
            }

            let matcher = matchers
                .get(field)
                .ok_or_else(|| CodecError::MissingMatcher {
                    field: field.clone(),
                })?;

            match matcher.find_match(&content, value) {
                Some(found) => {
                    let end = found.end();
                    if end > len {
                        return Err(CodecError::InvalidSpan {
                            field: field.clone(),
                            start: found.start,
                            end,
                            len,
                        });
                    }
                    debug!("Found {} at {}..{}", field, found.start, end);
                    annotations.push(Annotation::new(field.as_str(), found.start, end));
                }
                None => {
                    info!("did not find {}:{}", field, value);
                    unmatched.push(field.clone());
                }
            }
        }

        let mut record = AnnotationRecord::new(content);
        record.annotations = annotations;

        Ok(EncodeReport {
            record,
            unmatched,
            skipped,
        })
    }
}
