//! JSON normalization utilities.
//!
//! Canonicalizes JSON by sorting object keys recursively, for deterministic
//! comparisons: idempotence checks, config diffing, test assertions.

use serde_json::{Map, Value};

use crate::error::{Result, SettingsError};

/// Recursively normalize a JSON value by sorting object keys.
///
/// - Objects: keys sorted alphabetically, values recursively normalized
/// - Arrays: order preserved, elements recursively normalized
/// - Scalars: returned as-is
///
/// # Examples
/// ```
/// use serde_json::json;
/// use xm_config::json_norm::normalize_value;
///
/// let output = normalize_value(json!({"z": 1, "a": 2}));
/// assert_eq!(serde_json::to_string(&output).unwrap(), r#"{"a":2,"z":1}"#);
/// ```
#[must_use]
pub fn normalize_value(v: Value) -> Value {
    match v {
        Value::Object(mut m) => {
            let mut nm = Map::new();
            let mut keys: Vec<_> = m.keys().cloned().collect();
            keys.sort_unstable();
            for k in keys {
                if let Some(vv) = m.remove(&k) {
                    nm.insert(k, normalize_value(vv));
                }
            }
            Value::Object(nm)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_value).collect()),
        x => x,
    }
}

/// Parse JSON text, normalize it, and return the compact canonical string.
///
/// Two settings documents that differ only in key order and whitespace
/// canonicalize to identical strings.
///
/// # Errors
/// [`SettingsError::MalformedJson`] when the text is not valid JSON.
pub fn canonical_string(text: &str) -> Result<String> {
    let v: Value = serde_json::from_str(text).map_err(|e| SettingsError::MalformedJson {
        context: "json document",
        message: e.to_string(),
    })?;
    serde_json::to_string(&normalize_value(v)).map_err(|e| SettingsError::MalformedJson {
        context: "json document",
        message: e.to_string(),
    })
}
