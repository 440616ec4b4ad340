//! Theme settings migration on theme switch
//!
//! Settings are compared as flat dotted key paths (`colors.primary`). Only keys the new
//! theme declares are candidates for preservation; everything else is dropped.

use crate::contract::FlatSettings;
use serde_json::{Map, Value};

/// Merge a store's current settings onto the defaults of the theme it switches to.
///
/// Same-theme reactivation returns `current` unchanged. Never fails: unknown keys are
/// ignored so incompatible settings shapes cannot block a theme switch.
pub fn migrate(
    current: &FlatSettings,
    new_defaults: &FlatSettings,
    from_theme_code: &str,
    to_theme_code: &str,
) -> FlatSettings {
    if from_theme_code == to_theme_code {
        return current.clone();
    }

    let mut merged = new_defaults.clone();
    for (key, value) in merged.iter_mut() {
        if let Some(user_value) = current.get(key) {
            *value = user_value.clone();
        }
    }

    let dropped = current
        .keys()
        .filter(|key| !new_defaults.contains_key(*key))
        .count();
    if dropped > 0 {
        tracing::debug!(
            from = from_theme_code,
            to = to_theme_code,
            dropped,
            "settings keys not declared by the new theme were dropped"
        );
    }

    merged
}

/// Flatten a nested JSON object into dotted keys. Arrays and scalars are leaves; empty
/// objects are dropped. A non-object root yields no keys.
pub fn flatten_settings(value: &Value) -> FlatSettings {
    let mut out = FlatSettings::new();
    if let Value::Object(map) = value {
        flatten_into(map, "", &mut out);
    }
    out
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut FlatSettings) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten_into(inner, &path, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

/// Rebuild a nested JSON object from dotted keys. When a key is both a leaf and a
/// prefix of another key, the deeper key wins.
pub fn unflatten_settings(flat: &FlatSettings) -> Value {
    let mut root = Map::new();
    for (path, value) in flat {
        insert_path(&mut root, path, value.clone());
    }
    Value::Object(root)
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut node = root;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            let has_children = matches!(node.get(segment), Some(Value::Object(_)));
            if !has_children {
                node.insert(segment.to_string(), value);
            }
            return;
        }
        let entry = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(next) => node = next,
            _ => return,
        }
    }
}
