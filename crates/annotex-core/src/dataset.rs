//! Training dataset export: one record file per document plus an
//! import manifest listing each file with its split.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::codec::{AnnotationCodec, EncodeReport};
use crate::error::{AnnotexError, Result};
use crate::matchers::MatcherSet;
use crate::models::value::ExpectedValues;
use crate::sink::PayloadSink;

/// Dataset split a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetSplit {
    Train,
    Validation,
    Test,
    /// Left for the training service to assign.
    Unassigned,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "TRAIN",
            Self::Validation => "VALIDATION",
            Self::Test => "TEST",
            Self::Unassigned => "UNASSIGNED",
        }
    }
}

impl std::fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic split assignment by position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPlan {
    validation: f32,
    test: f32,
}

impl SplitPlan {
    /// Create a plan; both fractions must lie in [0, 1] and sum to at most 1.
    pub fn new(validation: f32, test: f32) -> Result<Self> {
        let in_range = |f: f32| (0.0..=1.0).contains(&f);
        if !in_range(validation) || !in_range(test) || validation + test > 1.0 {
            return Err(AnnotexError::Config(format!(
                "invalid split fractions: validation={} test={}",
                validation, test
            )));
        }
        Ok(Self { validation, test })
    }

    /// Plan that leaves every record unassigned.
    pub fn unassigned() -> Self {
        Self {
            validation: 0.0,
            test: 0.0,
        }
    }

    /// Splits for `n` records in order.
    ///
    /// The last `round(n * test)` records are TEST, the
    /// `round(n * validation)` before them VALIDATION, the rest TRAIN.
    pub fn assign(&self, n: usize) -> Vec<DatasetSplit> {
        if self.validation == 0.0 && self.test == 0.0 {
            return vec![DatasetSplit::Unassigned; n];
        }

        let n_test = ((n as f32) * self.test).round() as usize;
        let n_test = n_test.min(n);
        let n_validation = (((n as f32) * self.validation).round() as usize).min(n - n_test);
        let train_end = n - n_test - n_validation;

        (0..n)
            .map(|i| {
                if i < train_end {
                    DatasetSplit::Train
                } else if i < n - n_test {
                    DatasetSplit::Validation
                } else {
                    DatasetSplit::Test
                }
            })
            .collect()
    }
}

impl Default for SplitPlan {
    fn default() -> Self {
        Self::unassigned()
    }
}

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub split: DatasetSplit,
    pub uri: String,
}

/// Import manifest: `SPLIT,uri` lines without a header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportManifest {
    rows: Vec<ManifestRow>,
}

impl ImportManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, split: DatasetSplit, uri: impl Into<String>) {
        self.rows.push(ManifestRow {
            split,
            uri: uri.into(),
        });
    }

    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for row in &self.rows {
            writer.write_record([row.split.as_str(), row.uri.as_str()])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AnnotexError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| AnnotexError::Config(e.to_string()))
    }
}

/// A document to encode: a name (used for the record file), its text
/// and the expected field values.
#[derive(Debug, Clone)]
pub struct DatasetDocument {
    pub name: String,
    pub text: String,
    pub values: ExpectedValues,
}

/// Outcome of a dataset build.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub manifest: ImportManifest,
    /// Encoding report per document name.
    pub reports: Vec<(String, EncodeReport)>,
}

/// Encodes documents and writes records plus manifest to a sink.
pub struct DatasetBuilder<'a> {
    codec: AnnotationCodec,
    matchers: &'a MatcherSet,
    plan: SplitPlan,
    uri_prefix: String,
    manifest_name: String,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(matchers: &'a MatcherSet) -> Self {
        Self {
            codec: AnnotationCodec::new(),
            matchers,
            plan: SplitPlan::unassigned(),
            uri_prefix: String::new(),
            manifest_name: "import.csv".to_string(),
        }
    }

    /// Set the split plan.
    pub fn with_plan(mut self, plan: SplitPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Set the prefix used for manifest URIs.
    pub fn with_uri_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.uri_prefix = prefix.into();
        self
    }

    /// Set the manifest file name.
    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn plan(&self) -> SplitPlan {
        self.plan
    }

    /// File name a document's record is written to.
    pub fn record_file(name: &str) -> String {
        format!("{}.jsonl", name)
    }

    /// Manifest URI for a record file.
    pub fn uri_for(&self, file: &str) -> String {
        let prefix = self.uri_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", prefix, file)
        }
    }

    /// Encode one document and write its record.
    pub fn write_document(
        &self,
        doc: &DatasetDocument,
        split: DatasetSplit,
        sink: &dyn PayloadSink,
    ) -> Result<(ManifestRow, EncodeReport)> {
        let report = self
            .codec
            .encode_detailed(&doc.text, &doc.values, self.matchers)?;
        if report.record.annotations.is_empty() {
            warn!("Document {} has no annotations", doc.name);
        }

        let file = Self::record_file(&doc.name);
        let line = report.record.to_json_line()?;
        sink.put(&file, &format!("{}\n", line))?;

        Ok((
            ManifestRow {
                split,
                uri: self.uri_for(&file),
            },
            report,
        ))
    }

    /// Write the manifest.
    pub fn write_manifest(&self, manifest: &ImportManifest, sink: &dyn PayloadSink) -> Result<()> {
        sink.put(&self.manifest_name, &manifest.to_csv()?)
    }

    /// Encode every document, write the records and the manifest.
    ///
    /// Stops at the first document that fails to encode; nothing is
    /// written for that document and the manifest is not written.
    pub fn build(&self, docs: &[DatasetDocument], sink: &dyn PayloadSink) -> Result<DatasetSummary> {
        let splits = self.plan.assign(docs.len());
        let mut manifest = ImportManifest::new();
        let mut reports = Vec::with_capacity(docs.len());

        for (doc, split) in docs.iter().zip(splits) {
            let (row, report) = self.write_document(doc, split, sink)?;
            manifest.rows.push(row);
            reports.push((doc.name.clone(), report));
        }

        self.write_manifest(&manifest, sink)?;
        info!(
            "Wrote {} records and manifest {}",
            manifest.len(),
            self.manifest_name
        );

        Ok(DatasetSummary { manifest, reports })
    }
}
