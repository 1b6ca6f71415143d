//! Structured records
//!
//! A record is an ordered key-value tree: labels as printed by the simulator map to numbers,
//! strings, nested groups or ordered sequences. Field order is preserved (serde_json is built
//! with `preserve_order`) because downstream consumers key by label text at arbitrary depth and
//! because identical input must serialize to identical bytes.

use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

/// Unwrap a `json!` object into a record; anything else is stored under `Value`.
pub fn into_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => {
            let mut record = Record::new();
            record.insert("Value".to_string(), other);
            record
        }
    }
}

/// Merge `other` into `target`, concatenating sequences that appear in both.
///
/// Returns the keys that were overwritten.
pub fn merge(target: &mut Record, other: Record) -> Vec<String> {
    let mut overwritten = Vec::new();
    for (key, value) in other {
        if let Some(existing) = target.get_mut(&key) {
            match (existing, value) {
                (Value::Array(existing), Value::Array(more)) => existing.extend(more),
                (slot, value) => {
                    *slot = value;
                    overwritten.push(key);
                }
            }
        } else {
            target.insert(key, value);
        }
    }
    overwritten
}

/// Read a 3-vector stored as a three-element array.
pub fn vector3(value: &Value) -> Option<[f64; 3]> {
    match value.as_array()?.as_slice() {
        [x, y, z] => Some([x.as_f64()?, y.as_f64()?, z.as_f64()?]),
        _ => None,
    }
}
