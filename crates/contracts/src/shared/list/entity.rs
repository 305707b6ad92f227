use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::filter::CategoryFilter;
use super::normalize::Canonical;
use super::path::{resolve_first, scalar_text};

/// Sentinel selector value meaning "no constraint".
pub const ALL_SELECTOR: &str = "all";

// ============================================================================
// Record id
// ============================================================================

/// Стабильный идентификатор записи списка (из `id` или `_id` сервера)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Returns `None` for blank ids.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Reads an id from a JSON scalar (string or number).
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s.clone()),
            Value::Number(n) => Self::new(n.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Field descriptors
// ============================================================================

/// Value of a categorical field after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

/// How a categorical field is read and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Exact string match; `fold_case` compares lowercased values.
    Text { fold_case: bool },
    /// Boolean status; a missing field reads as `false`.
    /// `on`/`off` are the selector labels the UI uses for true/false.
    Flag {
        on: &'static str,
        off: &'static str,
    },
}

/// Categorical filter definition of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Filter name used in `FilterState`
    pub name: &'static str,
    /// Dotted path into the raw record
    pub path: &'static str,
    pub kind: FieldKind,
}

impl FilterField {
    pub const fn text(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            kind: FieldKind::Text { fold_case: false },
        }
    }

    pub const fn text_folded(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            kind: FieldKind::Text { fold_case: true },
        }
    }

    pub const fn flag(
        name: &'static str,
        path: &'static str,
        on: &'static str,
        off: &'static str,
    ) -> Self {
        Self {
            name,
            path,
            kind: FieldKind::Flag { on, off },
        }
    }

    /// Reads the field from a raw record.
    ///
    /// Text fields that are missing or blank give `None`; flags give `Flag(false)`.
    pub fn extract(&self, raw: &Value) -> Option<FieldValue> {
        let value = resolve_first(raw, self.path);
        match self.kind {
            FieldKind::Text { fold_case } => value.and_then(scalar_text).map(|s| {
                if fold_case {
                    FieldValue::Text(s.to_lowercase())
                } else {
                    FieldValue::Text(s)
                }
            }),
            FieldKind::Flag { .. } => Some(FieldValue::Flag(
                value.and_then(Value::as_bool).unwrap_or(false),
            )),
        }
    }

    /// Converts a UI selector (`"all"`, `"active"`, `"Mumbai"`, ...) into a filter.
    pub fn parse_selector(&self, selector: &str) -> CategoryFilter {
        let selector = selector.trim();
        if selector.is_empty() || selector.eq_ignore_ascii_case(ALL_SELECTOR) {
            return CategoryFilter::All;
        }

        match self.kind {
            FieldKind::Text { .. } => CategoryFilter::Is(FieldValue::Text(selector.to_string())),
            FieldKind::Flag { on, off } => {
                if selector.eq_ignore_ascii_case(on) {
                    CategoryFilter::Is(FieldValue::Flag(true))
                } else if selector.eq_ignore_ascii_case(off) {
                    CategoryFilter::Is(FieldValue::Flag(false))
                } else {
                    log::warn!(
                        "unknown selector '{}' for filter '{}', ignoring",
                        selector,
                        self.name
                    );
                    CategoryFilter::All
                }
            }
        }
    }

    /// Whether an extracted value satisfies the wanted value.
    pub(crate) fn accepts(&self, actual: Option<&FieldValue>, wanted: &FieldValue) -> bool {
        match (self.kind, actual, wanted) {
            (FieldKind::Text { fold_case: true }, Some(FieldValue::Text(a)), FieldValue::Text(w)) => {
                *a == w.to_lowercase()
            }
            (_, Some(a), w) => a == w,
            (FieldKind::Flag { .. }, None, FieldValue::Flag(w)) => !*w,
            _ => false,
        }
    }
}

/// Comparison used for a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// RFC 3339 datetime or `YYYY-MM-DD`; missing or unparsable counts as the epoch.
    Date,
    /// Lexicographic; records without the field sort after those with it.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub path: &'static str,
    pub kind: SortKind,
}

impl SortField {
    pub const fn date(path: &'static str) -> Self {
        Self {
            path,
            kind: SortKind::Date,
        }
    }

    pub const fn text(path: &'static str) -> Self {
        Self {
            path,
            kind: SortKind::Text,
        }
    }
}

// ============================================================================
// Entity schema
// ============================================================================

/// Описание сущности для списочной формы
///
/// One zero-sized implementor per list page. All data is static.
pub trait ListEntity {
    /// Plural key of list responses (`colonies`)
    fn collection_name() -> &'static str;

    /// Singular key of mutation responses (`colony`)
    fn element_name() -> &'static str;

    /// Name for messages (`main categories`)
    fn list_name() -> &'static str {
        Self::collection_name()
    }

    /// Paths whose values take part in free-text search
    fn search_paths() -> &'static [&'static str];

    fn filter_fields() -> &'static [FilterField] {
        &[]
    }

    /// Array fields whose items get their own `id` during normalization
    fn nested_relations() -> &'static [&'static str] {
        &[]
    }

    /// Primary key first, then tie-breaks
    fn sort_fields() -> &'static [SortField] {
        &[]
    }

    /// Fixed predicate applied before any user filter
    fn admits(_record: &Canonical) -> bool {
        true
    }

    /// Keys tried, in order, when a list response is wrapped in an object.
    fn list_keys() -> [&'static str; 2] {
        [Self::collection_name(), "data"]
    }

    /// Keys tried, in order, when a mutation response wraps its record.
    fn record_keys() -> [&'static str; 2] {
        [Self::element_name(), "data"]
    }

    fn filter_field(name: &str) -> Option<&'static FilterField> {
        Self::filter_fields().iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CITY: FilterField = FilterField::text("city", "city");
    const ROLE: FilterField = FilterField::text_folded("role", "role");
    const BLOCKED: FilterField = FilterField::flag("blocked", "isBlocked", "blocked", "active");

    #[test]
    fn test_record_id() {
        assert_eq!(RecordId::new("  "), None);
        assert_eq!(
            RecordId::from_json(&json!(42)).map(|id| id.to_string()),
            Some("42".to_string())
        );
        assert_eq!(RecordId::from_json(&json!({ "id": 1 })), None);
    }

    #[test]
    fn test_extract_text_and_flag() {
        let raw = json!({ "city": "Mumbai", "role": "Worker" });
        assert_eq!(CITY.extract(&raw), Some(FieldValue::Text("Mumbai".into())));
        assert_eq!(ROLE.extract(&raw), Some(FieldValue::Text("worker".into())));
        assert_eq!(BLOCKED.extract(&raw), Some(FieldValue::Flag(false)));
        assert_eq!(CITY.extract(&json!({})), None);
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!(CITY.parse_selector("all"), CategoryFilter::All);
        assert_eq!(CITY.parse_selector(""), CategoryFilter::All);
        assert_eq!(
            BLOCKED.parse_selector("active"),
            CategoryFilter::Is(FieldValue::Flag(false))
        );
        assert_eq!(
            BLOCKED.parse_selector("blocked"),
            CategoryFilter::Is(FieldValue::Flag(true))
        );
        assert_eq!(BLOCKED.parse_selector("maybe"), CategoryFilter::All);
    }

    #[test]
    fn test_accepts_folds_case() {
        let actual = ROLE.extract(&json!({ "role": "WORKER" }));
        assert!(ROLE.accepts(actual.as_ref(), &FieldValue::Text("Worker".into())));
        assert!(!CITY.accepts(None, &FieldValue::Text("Mumbai".into())));
        assert!(BLOCKED.accepts(None, &FieldValue::Flag(false)));
    }
}
