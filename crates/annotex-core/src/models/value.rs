//! Expected field values supplied alongside training text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value a field is expected to take somewhere in the text.
///
/// Values come from tabular ground truth, so numbers and gaps are common.
/// A NaN number and an explicit `null` both mean "value unknown" and
/// the field is left out of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValue {
    /// Textual value.
    Text(String),
    /// Numeric value (amounts, quantities, identifiers read as numbers).
    Number(f64),
    /// No value recorded.
    Missing,
}

impl ExpectedValue {
    /// Whether the value should be skipped rather than searched for.
    pub fn is_unknown(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(n) => n.is_nan(),
            Self::Text(_) => false,
        }
    }

    /// Text form used by text-based matchers.
    ///
    /// Whole numbers render without a fractional part, so `1234.0`
    /// is searched for as `1234`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) if n.is_nan() => None,
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            Self::Number(n) => Some(n.to_string()),
            Self::Missing => None,
        }
    }

    /// Numeric form, parsing text values when possible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExpectedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<&str> for ExpectedValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ExpectedValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for ExpectedValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Field name to expected value, in the caller's insertion order.
pub type ExpectedValues = IndexMap<String, ExpectedValue>;
