//! Dotted field paths over raw JSON records.
//!
//! `user.fullName` walks objects, `colonies[].name` fans out over an array.
//! Missing keys and `null` resolve to nothing, never to an error.

use serde_json::Value;

/// Resolves `path` against `value`, returning every non-null leaf it reaches.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current: Vec<&'a Value> = vec![value];

    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let (key, fan_out) = match segment.strip_suffix("[]") {
            Some(key) => (key, true),
            None => (segment, false),
        };

        let mut next = Vec::new();
        for node in current {
            let Some(child) = node.get(key) else {
                continue;
            };
            if fan_out {
                if let Value::Array(items) = child {
                    next.extend(items.iter());
                }
            } else {
                next.push(child);
            }
        }
        current = next;
    }

    current.retain(|v| !v.is_null());
    current
}

/// First non-null value at `path`.
pub fn resolve_first<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    resolve(value, path).into_iter().next()
}

/// Text form of a scalar used for searching and exact-match filters.
///
/// Strings and numbers only; blank strings, booleans and containers give `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
