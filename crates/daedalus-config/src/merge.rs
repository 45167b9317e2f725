//! Deep merge of configuration layers.
//!
//! Layers are merged key by key: mappings merge recursively, every other
//! value in a later layer replaces the earlier one. A `null` in a later
//! layer therefore overwrites whatever was there, and [`remove_nulls`]
//! then deletes it, which is how an override unregisters a route or a
//! middleware declared by an earlier layer.

use serde_json::Value;

/// Merges `overlay` into `base`.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value);
                    }
                    Some(existing) => *existing = value,
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Recursively deletes every mapping key whose value is `null`.
///
/// Sequences are walked but their elements are kept.
pub fn remove_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(remove_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(remove_nulls),
        _ => {}
    }
}

/// Merges all layers in order and removes the unset keys.
#[must_use]
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut merged = Value::Object(serde_json::Map::new());
    for layer in layers {
        deep_merge(&mut merged, layer);
    }
    remove_nulls(&mut merged);
    merged
}
