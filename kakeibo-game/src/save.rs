//! Save reconciliation.
//!
//! Loads arrive as JSON of unknown or legacy shape. Rather than scattering
//! defensive re-defaulting across every resolver, the load path reconciles
//! the value field-by-field against the serialized default aggregate once,
//! so every other component can assume a fully-populated state.

use serde_json::{Map, Value};

use crate::state::UserState;

/// Client-local key-value slot the serialized aggregate lives under.
pub const SAVE_SLOT_KEY: &str = "kakeibo.save.v1";

/// Reconcile a loaded JSON value against the default schema.
///
/// Objects merge key-by-key (loaded keys override, missing keys fall back to
/// the default); arrays are taken wholesale only when the loaded value is
/// actually an array; scalars are taken only when the JSON type matches.
/// Anything else degrades to the default. Never fails.
#[must_use]
pub fn merge_save(loaded: &Value) -> UserState {
    let defaults = serde_json::to_value(UserState::default()).unwrap_or(Value::Null);
    let merged = merge_value(&defaults, loaded);
    serde_json::from_value(merged).unwrap_or_default()
}

/// Parse and reconcile serialized save text. Unparseable text yields the
/// default state.
#[must_use]
pub fn merge_save_text(text: &str) -> UserState {
    let value = serde_json::from_str(text).unwrap_or(Value::Null);
    merge_save(&value)
}

fn merge_value(default: &Value, loaded: &Value) -> Value {
    match (default, loaded) {
        (Value::Object(default_map), Value::Object(loaded_map)) => {
            let mut out = Map::with_capacity(default_map.len());
            for (key, default_entry) in default_map {
                let merged = match loaded_map.get(key) {
                    Some(loaded_entry) => merge_value(default_entry, loaded_entry),
                    None => default_entry.clone(),
                };
                out.insert(key.clone(), merged);
            }
            // Keys absent from the default survive for open maps (material
            // counts); struct deserialization ignores the rest.
            for (key, loaded_entry) in loaded_map {
                if !out.contains_key(key) {
                    out.insert(key.clone(), loaded_entry.clone());
                }
            }
            Value::Object(out)
        }
        (Value::Array(_), Value::Array(_)) => loaded.clone(),
        (default_entry, loaded_entry) if same_kind(default_entry, loaded_entry) => {
            loaded_entry.clone()
        }
        (default_entry, _) => default_entry.clone(),
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Null, Value::Null)
            | (Value::Bool(_), Value::Bool(_))
            | (Value::Number(_), Value::Number(_))
            | (Value::String(_), Value::String(_))
    )
}
