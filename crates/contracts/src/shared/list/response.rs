//! Decoding of the response shapes the admin API is known to return.
//!
//! List endpoints answer with a bare array or an object holding the array
//! under the entity's plural key or `data`. Mutation endpoints answer with a
//! bare record or an object holding it under the singular key or `data`,
//! optionally next to a `message`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::server_message;

/// Where the records of a list response were found.
#[derive(Debug, Clone, PartialEq)]
pub enum ListShape {
    Bare(Vec<Value>),
    Keyed { key: &'static str, items: Vec<Value> },
    Absent,
}

impl ListShape {
    /// Tries each known shape in order: bare array, then `keys` in order.
    pub fn detect(response: Value, keys: &[&'static str]) -> Self {
        let mut map = match response {
            Value::Array(items) => return ListShape::Bare(items),
            Value::Object(map) => map,
            _ => return ListShape::Absent,
        };

        for key in keys {
            if let Some(Value::Array(_)) = map.get(*key) {
                if let Some(Value::Array(items)) = map.remove(*key) {
                    return ListShape::Keyed { key: *key, items };
                }
            }
        }

        ListShape::Absent
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            ListShape::Bare(items) | ListShape::Keyed { items, .. } => items,
            ListShape::Absent => Vec::new(),
        }
    }
}

/// Records of a list response; empty when no known shape matches.
pub fn decode_list(response: Value, keys: &[&'static str]) -> Vec<Value> {
    let shape = ListShape::detect(response, keys);
    match &shape {
        ListShape::Bare(items) => log::debug!("list response: bare array of {}", items.len()),
        ListShape::Keyed { key, items } => {
            log::debug!("list response: {} records under '{}'", items.len(), key)
        }
        ListShape::Absent => log::debug!("list response: no records found, using empty list"),
    }
    shape.into_items()
}

/// Record and message carried by a create/update response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationEnvelope {
    pub record: Option<Value>,
    pub message: Option<String>,
}

/// Splits a mutation response into its record and message.
///
/// The record comes from the first of `keys` holding an object; otherwise the
/// response object itself counts as the record unless it is empty or only has `message`.
pub fn decode_mutation(response: &Value, keys: &[&'static str]) -> MutationEnvelope {
    let message = server_message(response);

    let Some(map) = response.as_object() else {
        return MutationEnvelope {
            record: None,
            message,
        };
    };

    let wrapped = keys
        .iter()
        .find_map(|k| map.get(*k).filter(|v| v.is_object()).cloned());

    let record = wrapped.or_else(|| {
        let only_message = map.keys().all(|k| k == "message");
        if only_message {
            None
        } else {
            Some(response.clone())
        }
    });

    MutationEnvelope { record, message }
}

// ============================================================================
// Bulk import
// ============================================================================

/// Итоги массового импорта из файла
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportSummary {
    pub imported: u32,
    pub failed: u32,
    pub duplicates: u32,
    pub total_records: u32,
}

/// Response of the bulk import endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportReport {
    pub summary: ImportSummary,
    pub errors: Vec<String>,
    pub message: Option<String>,
}

impl ImportReport {
    /// The list must be re-fetched when anything was imported.
    pub fn needs_reload(&self) -> bool {
        self.summary.imported > 0
    }

    /// Success toast text, e.g. `Successfully imported 3 colonies`.
    pub fn success_text(&self, list_name: &str) -> Option<String> {
        self.needs_reload()
            .then(|| format!("Successfully imported {} {}", self.summary.imported, list_name))
    }

    /// Warning toast text when some rows failed or were duplicates.
    pub fn warning_text(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.summary.failed > 0 {
            parts.push(format!("{} failed", self.summary.failed));
        }
        if self.summary.duplicates > 0 {
            parts.push(format!("{} duplicates skipped", self.summary.duplicates));
        }
        if parts.is_empty() {
            None
        } else {
            Some(format!("Import completed with: {}", parts.join(", ")))
        }
    }
}
