//! Shared helpers for WASM API operations
//!
//! Console logging macros, serde bridging to `JsValue`, and conversion of
//! the crate's typed errors into JS exceptions.

use wasm_bindgen::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Direction, ScrollContainer, Viewport};

// ============================================================================
// Browser console
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = debug)]
    fn console_debug(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = info)]
    fn console_info(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(s: &str);
}

/// Prefix on every line the viewer writes to the console
pub const CONSOLE_PREFIX: &str = "[morphology-viewer]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Write one prefixed line to the browser console
pub fn console_line(level: ConsoleLevel, msg: &str) {
    let line = format!("{} {}", CONSOLE_PREFIX, msg);
    match level {
        ConsoleLevel::Debug => console_debug(&line),
        ConsoleLevel::Info => console_info(&line),
        ConsoleLevel::Warn => console_warn(&line),
        ConsoleLevel::Error => console_error(&line),
    }
}

/// Debug line on the browser console
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::console_line(
            $crate::api::helpers::ConsoleLevel::Debug,
            &format!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::console_line(
            $crate::api::helpers::ConsoleLevel::Info,
            &format!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::console_line(
            $crate::api::helpers::ConsoleLevel::Warn,
            &format!($($arg)*),
        )
    };
}

/// Error line; boundary failures are also returned to JS as exceptions
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::console_line(
            $crate::api::helpers::ConsoleLevel::Error,
            &format!($($arg)*),
        )
    };
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(
    value: JsValue,
    error_context: &str,
) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        console_line(ConsoleLevel::Error, &msg);
        JsValue::from_str(&msg)
    })
}

/// Deserialize an optional argument; `undefined` and `null` give the default
pub fn deserialize_or_default<T: DeserializeOwned + Default>(
    value: JsValue,
    error_context: &str,
) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    deserialize(value, error_context)
}

/// Serialize a value to JavaScript with automatic error handling
///
/// Maps serialize as plain objects so the glue can use dot access.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        console_line(ConsoleLevel::Error, &msg);
        JsValue::from_str(&msg)
    })
}

// ============================================================================
// Argument Helpers
// ============================================================================

/// Build a viewport from the scroll arguments the glue passes around
///
/// `in_panel` selects the content panel as scroll container.
pub fn viewport(in_panel: bool, scroll_top: f32, height: f32) -> Viewport {
    let container = if in_panel {
        ScrollContainer::ContentPanel
    } else {
        ScrollContainer::Window
    };
    Viewport::new(container, scroll_top, height)
}

/// Direction from the `1` / `-1` convention of the glue
pub fn direction_from_i32(value: i32) -> Direction {
    if value < 0 {
        Direction::Previous
    } else {
        Direction::Next
    }
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert a typed error to a JsValue, logging it once
pub fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    let msg = err.to_string();
    console_line(ConsoleLevel::Error, &msg);
    JsValue::from_str(&msg)
}
