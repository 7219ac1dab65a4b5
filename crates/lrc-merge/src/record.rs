//! Record-level merge primitives

use serde_json::Value;

/// `{...existing, ...patch}`
///
/// Top-level fields of `patch` replace those of `existing`; nested objects are
/// replaced wholesale. Non-object operands resolve to `patch`.
#[must_use]
pub fn shallow_merge(existing: &Value, patch: &Value) -> Value {
    match (existing, patch) {
        (Value::Object(base), Value::Object(incoming)) => {
            let mut merged = base.clone();
            for (key, value) in incoming {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        _ => patch.clone(),
    }
}

/// Recursive field-wise merge
///
/// Only fields present in `patch` overwrite. An explicit `null` counts as
/// present. Arrays and scalars are replaced, objects are merged key by key.
#[must_use]
pub fn deep_merge(existing: &Value, patch: &Value) -> Value {
    match (existing, patch) {
        (Value::Object(base), Value::Object(incoming)) => {
            let mut merged = base.clone();
            for (key, value) in incoming {
                let next = match base.get(key) {
                    Some(current) => deep_merge(current, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        _ => patch.clone(),
    }
}
