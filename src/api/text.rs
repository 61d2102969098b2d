//! Stateless exports: script conversion, normalization and offline
//! frequency computation

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, serialize, to_js_error};
use crate::regions::{parse_distance, SearchItemPayload};
use crate::script;
use crate::stats::compute_frequency_dataset;
use crate::wasm_info;

#[wasm_bindgen(js_name = toTargetScript)]
pub fn to_target_script(text: &str) -> String {
    script::to_target_script(text)
}

#[wasm_bindgen(js_name = toSourceScheme)]
pub fn to_source_scheme(text: &str) -> String {
    script::to_source_scheme(text)
}

/// Search-normalized form of target-script text
#[wasm_bindgen(js_name = normalizeArabic)]
pub fn normalize_arabic(text: &str) -> String {
    script::normalize_arabic(text)
}

#[wasm_bindgen(js_name = toPersianDigits)]
pub fn to_persian_digits(n: f64) -> String {
    script::to_persian_digits(n.max(0.0) as u64)
}

#[wasm_bindgen(js_name = parseDistance)]
pub fn parse_distance_value(value: JsValue) -> Result<u32, JsValue> {
    let value: serde_json::Value = deserialize(value, "Invalid distance")?;
    Ok(parse_distance(&value))
}

/// Validate a search payload without adding it anywhere
#[wasm_bindgen(js_name = validateSearchPayload)]
pub fn validate_search_payload(payload: JsValue) -> Result<JsValue, JsValue> {
    let payload: SearchItemPayload = deserialize(payload, "Invalid search payload")?;
    let (entry, _) = payload.validate().map_err(to_js_error)?;
    serialize(&entry, "Failed to serialize search item")
}

/// Roots-frequency dataset for a whole corpus, as a JSON string
#[wasm_bindgen(js_name = computeFrequencyDataset)]
pub fn compute_frequency_dataset_json(corpus: &str) -> Result<String, JsValue> {
    let dataset = compute_frequency_dataset(corpus);
    wasm_info!("frequency dataset computed for {} groups", dataset.groups.len());
    serde_json::to_string(&dataset).map_err(to_js_error)
}
