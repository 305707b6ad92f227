//! Local list update after a create/update/delete round-trip.
//!
//! The coordinator never guesses: when the server response does not carry a
//! record it can normalize, it asks the caller to reload the whole list.
//! Updates aimed at a record that has left the list in the meantime (deleted
//! while the edit was in flight) are dropped as stale.

use serde_json::{Map, Value};
use std::collections::HashSet;

use super::entity::{ListEntity, RecordId};
use super::normalize::Canonical;
use super::response::decode_mutation;

/// Что именно изменилось на сервере
#[derive(Debug, Clone, PartialEq)]
pub enum MutationKind {
    Create,
    Update { id: RecordId },
    Delete { id: RecordId },
    DeleteMany { ids: Vec<RecordId> },
    /// Partial change of a few fields (block/unblock).
    /// `fields` are the values that were requested; the response wins where it has them.
    Patch {
        id: RecordId,
        fields: Map<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// New list contents
    Applied(Vec<Canonical>),
    /// Response could not be interpreted; re-fetch the list
    ReloadRequired,
    /// Target record is no longer in the list; nothing changed
    Stale,
}

impl MutationOutcome {
    pub fn needs_reload(&self) -> bool {
        matches!(self, MutationOutcome::ReloadRequired)
    }
}

/// Computes the list after a mutation; `list` is not modified.
pub fn apply_mutation<E: ListEntity>(
    list: &[Canonical],
    response: &Value,
    kind: &MutationKind,
) -> MutationOutcome {
    match kind {
        MutationKind::Create => match parse_record::<E>(response) {
            Some(record) => {
                let new_id = record.id.clone();
                let mut out = Vec::with_capacity(list.len() + 1);
                out.push(record);
                out.extend(list.iter().filter(|r| r.id != new_id).cloned());
                MutationOutcome::Applied(out)
            }
            None => MutationOutcome::ReloadRequired,
        },

        MutationKind::Update { id } => {
            if !contains(list, id) {
                log::warn!("{}: update for {} arrived after it left the list", E::collection_name(), id);
                return MutationOutcome::Stale;
            }
            match parse_record::<E>(response) {
                Some(record) if record.id == *id => MutationOutcome::Applied(
                    list.iter()
                        .map(|r| if r.id == *id { record.clone() } else { r.clone() })
                        .collect(),
                ),
                Some(record) => {
                    log::debug!(
                        "{}: update response carries id {} instead of {}",
                        E::collection_name(),
                        record.id,
                        id
                    );
                    MutationOutcome::ReloadRequired
                }
                None => MutationOutcome::ReloadRequired,
            }
        }

        MutationKind::Delete { id } => {
            MutationOutcome::Applied(list.iter().filter(|r| r.id != *id).cloned().collect())
        }

        MutationKind::DeleteMany { ids } => {
            let ids: HashSet<&RecordId> = ids.iter().collect();
            MutationOutcome::Applied(list.iter().filter(|r| !ids.contains(&r.id)).cloned().collect())
        }

        MutationKind::Patch { id, fields } => {
            let Some(existing) = list.iter().find(|r| r.id == *id) else {
                log::warn!("{}: patch for {} arrived after it left the list", E::collection_name(), id);
                return MutationOutcome::Stale;
            };
            match patch_record::<E>(existing, response, fields) {
                Some(record) => MutationOutcome::Applied(
                    list.iter()
                        .map(|r| if r.id == *id { record.clone() } else { r.clone() })
                        .collect(),
                ),
                None => MutationOutcome::ReloadRequired,
            }
        }
    }
}

fn contains(list: &[Canonical], id: &RecordId) -> bool {
    list.iter().any(|r| r.id == *id)
}

fn parse_record<E: ListEntity>(response: &Value) -> Option<Canonical> {
    let record = decode_mutation(response, &E::record_keys()).record?;
    match Canonical::from_raw::<E>(record) {
        Ok(c) => Some(c),
        Err(e) => {
            log::debug!("{}: mutation response not usable: {}", E::collection_name(), e);
            None
        }
    }
}

fn patch_record<E: ListEntity>(
    existing: &Canonical,
    response: &Value,
    fields: &Map<String, Value>,
) -> Option<Canonical> {
    let mut merged = existing.raw.as_object()?.clone();

    let returned = decode_mutation(response, &E::record_keys())
        .record
        .and_then(|r| r.as_object().cloned())
        .unwrap_or_default();

    for (key, value) in fields {
        if !returned.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in returned {
        // the id of the list entry is fixed; `message` belongs to the envelope
        if !matches!(key.as_str(), "id" | "_id" | "message") {
            merged.insert(key, value);
        }
    }

    Canonical::from_raw::<E>(Value::Object(merged)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::entity::FilterField;
    use crate::shared::list::normalize::normalize_list;
    use serde_json::json;

    struct Users;

    impl ListEntity for Users {
        fn collection_name() -> &'static str {
            "users"
        }
        fn element_name() -> &'static str {
            "user"
        }
        fn search_paths() -> &'static [&'static str] {
            &["fullName"]
        }
        fn filter_fields() -> &'static [FilterField] {
            const FIELDS: &[FilterField] =
                &[FilterField::flag("blocked", "isBlocked", "blocked", "active")];
            FIELDS
        }
    }

    fn users() -> Vec<Canonical> {
        normalize_list::<Users>(vec![
            json!({ "_id": "u1", "fullName": "Asha", "isBlocked": false }),
            json!({ "_id": "u2", "fullName": "Vikram" }),
            json!({ "_id": "u3", "fullName": "Neha" }),
        ])
    }

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    fn applied(outcome: MutationOutcome) -> Vec<Canonical> {
        match outcome {
            MutationOutcome::Applied(list) => list,
            other => panic!("expected Applied, got {:?}", other),
        }
    }

    #[test]
    fn test_create_prepends() {
        let out = applied(apply_mutation::<Users>(
            &users(),
            &json!({ "message": "User registered", "user": { "_id": "u9", "fullName": "Kiran" } }),
            &MutationKind::Create,
        ));
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].id.as_str(), "u9");
        assert_eq!(out[1].id.as_str(), "u1");
    }

    #[test]
    fn test_create_with_known_id_does_not_duplicate() {
        let out = applied(apply_mutation::<Users>(
            &users(),
            &json!({ "_id": "u2", "fullName": "Vikram S" }),
            &MutationKind::Create,
        ));
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1", "u3"]);
    }

    #[test]
    fn test_ambiguous_create_requires_reload() {
        let list = users();
        for response in [json!({}), json!({ "message": "Created" }), json!({ "user": { "name": "x" } }), json!(null)] {
            assert_eq!(
                apply_mutation::<Users>(&list, &response, &MutationKind::Create),
                MutationOutcome::ReloadRequired
            );
        }
    }

    #[test]
    fn test_update_replaces_exactly_one() {
        let list = users();
        let out = applied(apply_mutation::<Users>(
            &list,
            &json!({ "data": { "_id": "u2", "fullName": "Vikram Singh" } }),
            &MutationKind::Update { id: id("u2") },
        ));

        assert_eq!(out.len(), list.len());
        let changed: Vec<usize> = (0..list.len()).filter(|&i| out[i] != list[i]).collect();
        assert_eq!(changed, vec![1]);
        assert_eq!(out[1].field_text("fullName"), "Vikram Singh");
    }

    #[test]
    fn test_update_ambiguous_or_mismatched() {
        let list = users();
        assert_eq!(
            apply_mutation::<Users>(&list, &json!({ "message": "ok" }), &MutationKind::Update { id: id("u2") }),
            MutationOutcome::ReloadRequired
        );
        assert_eq!(
            apply_mutation::<Users>(&list, &json!({ "_id": "u3" }), &MutationKind::Update { id: id("u2") }),
            MutationOutcome::ReloadRequired
        );
    }

    #[test]
    fn test_update_after_delete_is_stale() {
        let list = applied(apply_mutation::<Users>(
            &users(),
            &json!({ "message": "deleted" }),
            &MutationKind::Delete { id: id("u2") },
        ));
        assert_eq!(
            apply_mutation::<Users>(&list, &json!({ "_id": "u2" }), &MutationKind::Update { id: id("u2") }),
            MutationOutcome::Stale
        );
    }

    #[test]
    fn test_delete_completeness() {
        let list = users();
        let out = applied(apply_mutation::<Users>(&list, &json!({}), &MutationKind::Delete { id: id("u1") }));
        assert_eq!(out.len(), list.len() - 1);
        assert!(out.iter().all(|c| c.id.as_str() != "u1"));

        let out = applied(apply_mutation::<Users>(&list, &json!({}), &MutationKind::Delete { id: id("zz") }));
        assert_eq!(out, list);
    }

    #[test]
    fn test_delete_many() {
        let out = applied(apply_mutation::<Users>(
            &users(),
            &json!({ "message": "2 colonies deleted" }),
            &MutationKind::DeleteMany { ids: vec![id("u1"), id("u3"), id("nope")] },
        ));
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["u2"]);
    }

    #[test]
    fn test_patch_falls_back_to_requested_value() {
        let mut fields = Map::new();
        fields.insert("isBlocked".into(), json!(true));

        let out = applied(apply_mutation::<Users>(
            &users(),
            &json!({ "message": "User blocked" }),
            &MutationKind::Patch { id: id("u2"), fields: fields.clone() },
        ));
        assert!(out[1].field_flag("isBlocked"));
        assert_eq!(out[1].field_text("fullName"), "Vikram");

        // server value wins over the requested one
        let out = applied(apply_mutation::<Users>(
            &users(),
            &json!({ "user": { "_id": "u2", "isBlocked": false, "blockedAt": null } }),
            &MutationKind::Patch { id: id("u2"), fields },
        ));
        assert!(!out[1].field_flag("isBlocked"));
    }

    #[test]
    fn test_input_list_untouched() {
        let list = users();
        let before = list.clone();
        let _ = apply_mutation::<Users>(&list, &json!({ "_id": "u4" }), &MutationKind::Create);
        let _ = apply_mutation::<Users>(&list, &json!({}), &MutationKind::Delete { id: id("u1") });
        assert_eq!(list, before);
    }
}
