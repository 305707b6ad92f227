//! Normalization of raw server records into the canonical list shape.
//!
//! Records come with `_id`, `id` or both. After normalization every record
//! carries a string `id`, and declared nested relations are arrays whose
//! object items carry one too. Normalizing twice changes nothing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use super::entity::{FieldValue, ListEntity, RecordId, SortField, SortKind};
use super::path::{resolve, resolve_first, scalar_text};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has neither `id` nor `_id`")]
    MissingId,
}

/// Sort key extracted from a record, one per entity sort field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Milliseconds since the epoch
    Date(i64),
    Text(String),
    Missing,
}

impl SortKey {
    fn extract(raw: &Value, field: &SortField) -> Self {
        let value = resolve_first(raw, field.path);
        match field.kind {
            SortKind::Date => {
                SortKey::Date(value.and_then(Value::as_str).and_then(parse_millis).unwrap_or(0))
            }
            SortKind::Text => value
                .and_then(scalar_text)
                .map(SortKey::Text)
                .unwrap_or(SortKey::Missing),
        }
    }
}

fn parse_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Каноническая запись списка
#[derive(Debug, Clone, PartialEq)]
pub struct Canonical {
    pub id: RecordId,
    /// Values of the entity's search paths, in declaration order
    pub searchable: Vec<String>,
    /// Extracted categorical fields; text fields that are missing are absent
    pub categorical: BTreeMap<&'static str, FieldValue>,
    /// One key per entity sort field
    pub sort_key: Vec<SortKey>,
    /// Normalized server record, kept for display and payloads
    pub raw: Value,
}

impl Canonical {
    pub fn from_raw<E: ListEntity>(raw: Value) -> Result<Self, NormalizeError> {
        if !raw.is_object() {
            return Err(NormalizeError::NotAnObject);
        }
        let raw = normalize_value(raw, E::nested_relations());
        let id = raw
            .get("id")
            .and_then(RecordId::from_json)
            .ok_or(NormalizeError::MissingId)?;

        let searchable = E::search_paths()
            .iter()
            .flat_map(|path| resolve(&raw, path))
            .filter_map(scalar_text)
            .collect();

        let categorical = E::filter_fields()
            .iter()
            .filter_map(|f| f.extract(&raw).map(|v| (f.name, v)))
            .collect();

        let sort_key = E::sort_fields()
            .iter()
            .map(|f| SortKey::extract(&raw, f))
            .collect();

        Ok(Self {
            id,
            searchable,
            categorical,
            sort_key,
            raw,
        })
    }

    /// Text of the first value at `path`, empty when missing.
    pub fn field_text(&self, path: &str) -> String {
        resolve_first(&self.raw, path)
            .and_then(scalar_text)
            .unwrap_or_default()
    }

    /// Boolean at `path`; missing counts as `false`.
    pub fn field_flag(&self, path: &str) -> bool {
        resolve_first(&self.raw, path)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Ensures `id = id ?? _id` on the record and on the items of `nested` relations.
///
/// Relations that are absent or not arrays become empty arrays. String items
/// (bare ids) pass through unchanged. Non-object input is returned as is.
pub fn normalize_value(raw: Value, nested: &[&str]) -> Value {
    let mut map = match raw {
        Value::Object(map) => map,
        other => return other,
    };

    assign_id(&mut map);

    for key in nested {
        let items = match map.remove(*key) {
            Some(Value::Array(items)) => items.into_iter().map(normalize_item).collect(),
            _ => Vec::new(),
        };
        map.insert((*key).to_string(), Value::Array(items));
    }

    Value::Object(map)
}

fn normalize_item(item: Value) -> Value {
    match item {
        Value::Object(mut map) => {
            assign_id(&mut map);
            Value::Object(map)
        }
        other => other,
    }
}

fn assign_id(map: &mut Map<String, Value>) {
    let id = map
        .get("id")
        .and_then(RecordId::from_json)
        .or_else(|| map.get("_id").and_then(RecordId::from_json));
    if let Some(id) = id {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
}

/// Normalizes a fetched list.
///
/// Records without an id and repeated ids (first one wins) are dropped with a warning.
pub fn normalize_list<E: ListEntity>(raw: Vec<Value>) -> Vec<Canonical> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (index, item) in raw.into_iter().enumerate() {
        match Canonical::from_raw::<E>(item) {
            Ok(record) => {
                if seen.insert(record.id.clone()) {
                    out.push(record);
                } else {
                    log::warn!(
                        "{}: duplicate id {} at index {}, dropped",
                        E::collection_name(),
                        record.id,
                        index
                    );
                }
            }
            Err(e) => log::warn!("{}: record {} skipped: {}", E::collection_name(), index, e),
        }
    }

    out
}

/// Unique non-blank values at `path`, in first-seen order (filter dropdown options).
pub fn distinct_values<'a>(records: impl IntoIterator<Item = &'a Value>, path: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .flat_map(|r| resolve(r, path))
        .filter_map(scalar_text)
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::entity::FilterField;
    use serde_json::json;

    struct Catalog;

    impl ListEntity for Catalog {
        fn collection_name() -> &'static str {
            "mainCategories"
        }
        fn element_name() -> &'static str {
            "mainCategory"
        }
        fn search_paths() -> &'static [&'static str] {
            &["name", "serviceCategories[].name"]
        }
        fn filter_fields() -> &'static [FilterField] {
            const FIELDS: &[FilterField] = &[
                FilterField::text("city", "city"),
                FilterField::flag("status", "isActive", "active", "inactive"),
            ];
            FIELDS
        }
        fn nested_relations() -> &'static [&'static str] {
            &["serviceCategories"]
        }
        fn sort_fields() -> &'static [SortField] {
            const FIELDS: &[SortField] = &[SortField::date("date"), SortField::text("startTime")];
            FIELDS
        }
    }

    #[test]
    fn test_id_from_underscore_id() {
        let c = Canonical::from_raw::<Catalog>(json!({ "_id": "64f1", "name": "Home" })).unwrap();
        assert_eq!(c.id.as_str(), "64f1");
        assert_eq!(c.raw["id"], json!("64f1"));
        assert_eq!(c.raw["_id"], json!("64f1"));
    }

    #[test]
    fn test_id_preferred_over_underscore_id() {
        let v = normalize_value(json!({ "id": "a", "_id": "b" }), &[]);
        assert_eq!(v["id"], json!("a"));
    }

    #[test]
    fn test_nested_relations_heterogeneous() {
        let v = normalize_value(
            json!({
                "_id": "m1",
                "serviceCategories": [ { "_id": "s1", "name": "Plumbing" }, "s2", { "name": "orphan" } ]
            }),
            &["serviceCategories"],
        );
        assert_eq!(v["serviceCategories"][0]["id"], json!("s1"));
        assert_eq!(v["serviceCategories"][1], json!("s2"));
        assert!(v["serviceCategories"][2].get("id").is_none());

        let v = normalize_value(json!({ "_id": "m2" }), &["serviceCategories"]);
        assert_eq!(v["serviceCategories"], json!([]));

        let v = normalize_value(json!({ "_id": "m3", "serviceCategories": "oops" }), &["serviceCategories"]);
        assert_eq!(v["serviceCategories"], json!([]));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = json!({
            "_id": 17,
            "name": "Cleaning",
            "serviceCategories": [ { "_id": "s1", "name": "Maid" }, "s9" ],
            "date": "2025-01-03",
        });
        let once = Canonical::from_raw::<Catalog>(raw).unwrap();
        let twice = Canonical::from_raw::<Catalog>(once.raw.clone()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            normalize_value(once.raw.clone(), &["serviceCategories"]),
            once.raw
        );
    }

    #[test]
    fn test_missing_id_is_error() {
        assert_eq!(
            Canonical::from_raw::<Catalog>(json!({})),
            Err(NormalizeError::MissingId)
        );
        assert_eq!(
            Canonical::from_raw::<Catalog>(json!({ "_id": "" })),
            Err(NormalizeError::MissingId)
        );
        assert_eq!(
            Canonical::from_raw::<Catalog>(json!("s1")),
            Err(NormalizeError::NotAnObject)
        );
    }

    #[test]
    fn test_projection() {
        let c = Canonical::from_raw::<Catalog>(json!({
            "_id": "m1",
            "name": "Repairs",
            "serviceCategories": [ { "_id": "s1", "name": "Electrician" } ],
            "date": "2025-02-01T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(c.searchable, vec!["Repairs".to_string(), "Electrician".to_string()]);
        assert_eq!(c.categorical.get("city"), None);
        assert_eq!(c.categorical.get("status"), Some(&FieldValue::Flag(false)));
        assert_eq!(
            c.sort_key,
            vec![SortKey::Date(1_738_404_000_000), SortKey::Missing]
        );
    }

    #[test]
    fn test_normalize_list_drops_bad_and_duplicate() {
        let list = normalize_list::<Catalog>(vec![
            json!({ "_id": "a", "name": "first" }),
            json!({ "name": "no id" }),
            json!({ "id": "a", "name": "again" }),
            json!({ "_id": "b" }),
        ]);
        let ids: Vec<&str> = list.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(list[0].field_text("name"), "first");
    }

    #[test]
    fn test_distinct_values() {
        let records = vec![
            json!({ "city": "Pune" }),
            json!({ "city": "Mumbai" }),
            json!({ "city": "" }),
            json!({ "city": "Pune" }),
            json!({}),
        ];
        assert_eq!(
            distinct_values(records.iter(), "city"),
            vec!["Pune".to_string(), "Mumbai".to_string()]
        );
    }
}
