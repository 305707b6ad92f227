//! Фильтрация, поиск и сортировка списков на клиенте

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::entity::{FieldValue, ListEntity};
use super::normalize::{Canonical, SortKey};

/// Ограничение по одному категориальному полю
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No constraint (`"all"` in the UI)
    #[default]
    All,
    Is(FieldValue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Состояние фильтров списочной формы
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Free-text query; blank matches everything
    pub query: String,
    /// Filter name -> constraint, combined with AND
    pub categories: BTreeMap<String, CategoryFilter>,
    /// `None` keeps the source order
    pub sort: Option<SortOrder>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, name: impl Into<String>, filter: CategoryFilter) -> Self {
        self.categories.insert(name.into(), filter);
        self
    }

    /// Sets a filter from its UI selector label; unknown filter names are ignored.
    pub fn with_selector<E: ListEntity>(self, name: &str, selector: &str) -> Self {
        match E::filter_field(name) {
            Some(field) => {
                let filter = field.parse_selector(selector);
                self.with_category(name, filter)
            }
            None => {
                log::warn!("{}: no filter named '{}'", E::collection_name(), name);
                self
            }
        }
    }

    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// Whether the state narrows the list at all (sorting alone does not).
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
            || self
                .categories
                .values()
                .any(|f| !matches!(f, CategoryFilter::All))
    }
}

/// Applies `state` to `list`; the input is left untouched.
///
/// Order of the source list is kept unless `state.sort` is set; sorting is stable.
pub fn filter<E: ListEntity>(list: &[Canonical], state: &FilterState) -> Vec<Canonical> {
    let needle = state.query.trim().to_lowercase();

    let mut out: Vec<Canonical> = list
        .iter()
        .filter(|r| E::admits(r))
        .filter(|r| matches_query(r, &needle))
        .filter(|r| {
            state
                .categories
                .iter()
                .all(|(name, f)| matches_category::<E>(r, name, f))
        })
        .cloned()
        .collect();

    if let Some(order) = state.sort {
        out.sort_by(|a, b| {
            let cmp = compare_sort_keys(&a.sort_key, &b.sort_key);
            match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        });
    }

    out
}

/// `needle` must already be trimmed and lowercased.
fn matches_query(record: &Canonical, needle: &str) -> bool {
    needle.is_empty()
        || record
            .searchable
            .iter()
            .any(|v| v.to_lowercase().contains(needle))
}

fn matches_category<E: ListEntity>(record: &Canonical, name: &str, filter: &CategoryFilter) -> bool {
    let CategoryFilter::Is(wanted) = filter else {
        return true;
    };
    let actual = record.categorical.get(name);
    match E::filter_field(name) {
        Some(field) => field.accepts(actual, wanted),
        None => actual == Some(wanted),
    }
}

/// Records without a text key go after those that have one, so the order stays total.
fn compare_sort_keys(a: &[SortKey], b: &[SortKey]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = match (x, y) {
            (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
            (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Greater,
            (_, SortKey::Missing) => Ordering::Less,
            _ => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::entity::{FilterField, SortField};
    use crate::shared::list::normalize::normalize_list;
    use serde_json::{json, Value};

    struct Colonies;

    impl ListEntity for Colonies {
        fn collection_name() -> &'static str {
            "colonies"
        }
        fn element_name() -> &'static str {
            "colony"
        }
        fn search_paths() -> &'static [&'static str] {
            &["name", "city", "pincode"]
        }
        fn filter_fields() -> &'static [FilterField] {
            const FIELDS: &[FilterField] = &[
                FilterField::text("city", "city"),
                FilterField::flag("status", "isActive", "active", "inactive"),
            ];
            FIELDS
        }
    }

    struct Slots;

    impl ListEntity for Slots {
        fn collection_name() -> &'static str {
            "availability"
        }
        fn element_name() -> &'static str {
            "availability"
        }
        fn search_paths() -> &'static [&'static str] {
            &["notes"]
        }
        fn sort_fields() -> &'static [SortField] {
            const FIELDS: &[SortField] = &[SortField::date("date"), SortField::text("startTime")];
            FIELDS
        }
    }

    fn colonies() -> Vec<Canonical> {
        normalize_list::<Colonies>(vec![
            json!({ "_id": "1", "name": "Green Park", "city": "Mumbai", "isActive": true, "pincode": 400001 }),
            json!({ "_id": "2", "name": "Blue Hills", "city": "Mumbai", "isActive": false }),
            json!({ "_id": "3", "name": "Sunrise", "city": "Mumbai", "isActive": true }),
            json!({ "_id": "4", "name": "Lake View", "city": "Pune", "isActive": true }),
            json!({ "_id": "5", "name": "No City" }),
        ])
    }

    fn ids(list: &[Canonical]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_search_scenario() {
        let list = normalize_list::<Colonies>(vec![
            json!({ "_id": "a", "name": "Ramesh Electrician" }),
            json!({ "_id": "b", "name": "Suresh Plumber" }),
        ]);
        let out = filter::<Colonies>(&list, &FilterState::new().with_query("elect"));
        assert_eq!(ids(&out), vec!["a"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_trims() {
        let out = filter::<Colonies>(&colonies(), &FilterState::new().with_query("  GREEN "));
        assert_eq!(ids(&out), vec!["1"]);

        let out = filter::<Colonies>(&colonies(), &FilterState::new().with_query("4000"));
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_empty_query_is_identity() {
        let list = colonies();
        let out = filter::<Colonies>(&list, &FilterState::new().with_query("   "));
        assert_eq!(out, list);
    }

    #[test]
    fn test_city_and_status_scenario() {
        let state = FilterState::new()
            .with_selector::<Colonies>("city", "Mumbai")
            .with_selector::<Colonies>("status", "active");
        let out = filter::<Colonies>(&colonies(), &state);
        assert_eq!(ids(&out), vec!["1", "3"]);
    }

    #[test]
    fn test_and_composition_is_intersection() {
        let list = colonies();
        let city = FilterState::new().with_selector::<Colonies>("city", "Mumbai");
        let status = FilterState::new().with_selector::<Colonies>("status", "active");
        let both = city.clone().with_selector::<Colonies>("status", "active");

        let a = filter::<Colonies>(&list, &city);
        let b = filter::<Colonies>(&list, &status);
        let expected: Vec<&str> = ids(&a)
            .into_iter()
            .filter(|id| ids(&b).contains(id))
            .collect();

        assert_eq!(ids(&filter::<Colonies>(&list, &both)), expected);
    }

    #[test]
    fn test_missing_fields() {
        let list = colonies();

        // text filter: missing city never matches
        let out = filter::<Colonies>(&list, &FilterState::new().with_selector::<Colonies>("city", "Pune"));
        assert_eq!(ids(&out), vec!["4"]);

        // flag filter: missing isActive reads as false
        let out = filter::<Colonies>(
            &list,
            &FilterState::new().with_selector::<Colonies>("status", "inactive"),
        );
        assert_eq!(ids(&out), vec!["2", "5"]);
    }

    #[test]
    fn test_all_selector_and_unknown_filter() {
        let list = colonies();
        let state = FilterState::new()
            .with_selector::<Colonies>("city", "all")
            .with_selector::<Colonies>("colour", "red");
        assert!(!state.is_active());
        assert_eq!(filter::<Colonies>(&list, &state).len(), list.len());

        let state = FilterState::new().with_category("colour", CategoryFilter::Is(FieldValue::Text("red".into())));
        assert!(filter::<Colonies>(&list, &state).is_empty());
    }

    #[test]
    fn test_purity_and_subset() {
        let list = colonies();
        let before = list.clone();
        let state = FilterState::new().with_query("e").with_selector::<Colonies>("status", "active");

        let first = filter::<Colonies>(&list, &state);
        let second = filter::<Colonies>(&list, &state);

        assert_eq!(first, second);
        assert_eq!(list, before);
        assert!(first.iter().all(|r| list.iter().any(|l| l.id == r.id)));
    }

    #[test]
    fn test_sort_by_date_then_start_time() {
        let raw: Vec<Value> = vec![
            json!({ "_id": "late", "date": "2025-03-02", "startTime": "09:00" }),
            json!({ "_id": "b", "date": "2025-03-01", "startTime": "14:00" }),
            json!({ "_id": "a", "date": "2025-03-01", "startTime": "08:30" }),
            json!({ "_id": "nodate", "startTime": "07:00" }),
            json!({ "_id": "notime", "date": "2025-03-01" }),
        ];
        let list = normalize_list::<Slots>(raw);

        let out = filter::<Slots>(&list, &FilterState::new().sorted(SortOrder::Ascending));
        assert_eq!(ids(&out), vec!["nodate", "a", "b", "notime", "late"]);

        let out = filter::<Slots>(&list, &FilterState::new().sorted(SortOrder::Descending));
        assert_eq!(ids(&out), vec!["late", "notime", "b", "a", "nodate"]);

        let unsorted = filter::<Slots>(&list, &FilterState::new());
        assert_eq!(ids(&unsorted), ids(&list));
    }
}
