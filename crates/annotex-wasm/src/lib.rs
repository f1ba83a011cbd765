//! WASM bindings for annotex.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use annotex_core::codec::{decode_all as decode_all_values, decode_field as decode_value};
use annotex_core::models::annotation::parse_predictions;
use annotex_core::models::config::MatcherConfig;
use annotex_core::models::value::ExpectedValues;
use annotex_core::AnnotationCodec;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Encode result handed back to JavaScript.
#[derive(Debug, Serialize)]
struct EncodeOutput {
    /// Training record as a single JSON line.
    line: String,
    unmatched: Vec<String>,
    skipped: Vec<String>,
}

fn encode_with(
    text: &str,
    values: &ExpectedValues,
    config: &MatcherConfig,
) -> Result<EncodeOutput, String> {
    let matchers = config.build(values.keys().map(String::as_str));
    let report = AnnotationCodec::new()
        .encode_detailed(text, values, &matchers)
        .map_err(|e| e.to_string())?;
    let line = report.record.to_json_line().map_err(|e| e.to_string())?;

    Ok(EncodeOutput {
        line,
        unmatched: report.unmatched,
        skipped: report.skipped,
    })
}

/// Encode text into a training record.
///
/// `values` is an object of field name to expected value; `matchers`
/// has the shape `{ fallback?: kind, fields?: { [field]: kind } }`.
/// Returns the record as a JSON line.
#[wasm_bindgen]
pub fn encode(text: &str, values: JsValue, matchers: JsValue) -> Result<String, JsValue> {
    let values: ExpectedValues = serde_wasm_bindgen::from_value(values).map_err(js_error)?;
    let config: MatcherConfig = serde_wasm_bindgen::from_value(matchers).map_err(js_error)?;

    encode_with(text, &values, &config)
        .map(|output| output.line)
        .map_err(js_error)
}

/// Value of `field` from the best-scoring prediction, or `undefined`.
///
/// `predictions` is the JSON prediction response.
#[wasm_bindgen]
pub fn decode_field(text: &str, predictions: &str, field: &str) -> Result<Option<String>, JsValue> {
    let results = parse_predictions(predictions).map_err(js_error)?;
    Ok(decode_value(text, &results, field))
}

/// Best value for every predicted field, as an object.
#[wasm_bindgen]
pub fn decode_all(text: &str, predictions: &str) -> Result<JsValue, JsValue> {
    let results = parse_predictions(predictions).map_err(js_error)?;
    let values = decode_all_values(text, &results);

    values
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

/// Encoder with a fixed matcher configuration.
#[wasm_bindgen]
pub struct Encoder {
    config: MatcherConfig,
}

#[wasm_bindgen]
impl Encoder {
    /// Create an encoder from a matcher configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(matchers: JsValue) -> Result<Encoder, JsValue> {
        let config = if matchers.is_undefined() || matchers.is_null() {
            MatcherConfig::default()
        } else {
            serde_wasm_bindgen::from_value(matchers).map_err(js_error)?
        };
        Ok(Self { config })
    }

    /// Encode text, returning the record line.
    #[wasm_bindgen]
    pub fn encode(&self, text: &str, values: JsValue) -> Result<String, JsValue> {
        let values: ExpectedValues = serde_wasm_bindgen::from_value(values).map_err(js_error)?;
        encode_with(text, &values, &self.config)
            .map(|output| output.line)
            .map_err(js_error)
    }

    /// Encode text, returning `{ line, unmatched, skipped }`.
    #[wasm_bindgen]
    pub fn encode_detailed(&self, text: &str, values: JsValue) -> Result<JsValue, JsValue> {
        let values: ExpectedValues = serde_wasm_bindgen::from_value(values).map_err(js_error)?;
        let output = encode_with(text, &values, &self.config).map_err(js_error)?;

        serde_wasm_bindgen::to_value(&output).map_err(js_error)
    }
}
