//! Configuration structures for encoding and decoding.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dataset::SplitPlan;
use crate::error::{AnnotexError, Result};
use crate::matchers::{MatcherKind, MatcherSet};

/// Main configuration for annotex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotexConfig {
    /// Which matcher locates each field.
    pub matchers: MatcherConfig,

    /// Prediction decoding configuration.
    pub decode: DecodeConfig,

    /// Dataset export configuration.
    pub dataset: DatasetConfig,
}

/// Field-to-matcher assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Matcher for fields not listed in `fields`.
    ///
    /// When unset, encoding a field that is not listed fails with a
    /// missing-matcher error.
    pub fallback: Option<MatcherKind>,

    /// Explicit matcher per field name.
    pub fields: IndexMap<String, MatcherKind>,
}

/// Prediction decoding configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Value reported for a field with no prediction.
    pub default_value: Option<String>,
}

/// Dataset export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Share of documents assigned to VALIDATION (0.0 - 1.0).
    pub validation_fraction: f32,

    /// Share of documents assigned to TEST (0.0 - 1.0).
    pub test_fraction: f32,

    /// Prefix joined with each record's file name in the import manifest
    /// (e.g. `gs://bucket/training`). Empty means relative paths.
    pub uri_prefix: String,

    /// File name of the import manifest.
    pub manifest_name: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            validation_fraction: 0.0,
            test_fraction: 0.0,
            uri_prefix: String::new(),
            manifest_name: "import.csv".to_string(),
        }
    }
}

impl DatasetConfig {
    /// Split plan described by this configuration.
    pub fn split_plan(&self) -> Result<SplitPlan> {
        SplitPlan::new(self.validation_fraction, self.test_fraction)
    }
}

impl MatcherConfig {
    /// Build matchers for the given field names.
    ///
    /// Listed fields always get their configured matcher; remaining names
    /// get the fallback if there is one and stay unregistered otherwise.
    pub fn build<'a>(&self, field_names: impl IntoIterator<Item = &'a str>) -> MatcherSet {
        let mut set = MatcherSet::new();
        for (field, kind) in &self.fields {
            set.insert(field.clone(), kind.build());
        }
        if let Some(fallback) = self.fallback {
            for field in field_names {
                if !set.contains(field) {
                    set.insert(field.to_string(), fallback.build());
                }
            }
        }
        set
    }
}

impl AnnotexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.dataset.split_plan()?;
        if self.dataset.manifest_name.trim().is_empty() {
            return Err(AnnotexError::Config(
                "dataset.manifest_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
