use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use marknorm_core::{NormalizeOptions, Normalizer};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsOptions {
    preserve_entities: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NormalizeResult {
    unescaped: String,
    uri: String,
    escaped: String,
}

#[wasm_bindgen]
pub fn unescape_string(text: &str) -> String {
    marknorm_core::unescape_string(text).into_owned()
}

#[wasm_bindgen]
pub fn normalize_uri(uri: &str) -> String {
    marknorm_core::normalize_uri(uri)
}

#[wasm_bindgen]
pub fn escape_output(text: Option<String>, preserve_entities: bool) -> String {
    marknorm_core::escape_output(text.as_deref(), preserve_entities).into_owned()
}

/// Run all three transforms over `text`: unescaped text, the unescaped text as
/// a link target, and the unescaped text escaped for output.
#[wasm_bindgen]
pub fn normalize(text: &str, options: JsValue) -> Result<JsValue, JsValue> {
    let normalizer = Normalizer::new().with_options(options_from_js(options)?);
    let unescaped = normalizer.unescape(text);
    let result = NormalizeResult {
        uri: normalizer.normalize_uri(&unescaped),
        escaped: normalizer.escape(&unescaped).into_owned(),
        unescaped: unescaped.into_owned(),
    };
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn options_from_js(value: JsValue) -> Result<NormalizeOptions, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(NormalizeOptions::default());
    }
    let parsed: JsOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let mut out = NormalizeOptions::default();
    if let Some(preserve_entities) = parsed.preserve_entities {
        out.preserve_entities = preserve_entities;
    }
    Ok(out)
}
