use serde::{Deserialize, Serialize};

use crate::shared::list::{Canonical, ListEntity};

/// Категория услуг (сантехник, электрик, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceCategory;

impl ListEntity for ServiceCategory {
    fn collection_name() -> &'static str {
        "categories"
    }

    fn element_name() -> &'static str {
        "category"
    }

    fn list_name() -> &'static str {
        "service categories"
    }

    fn search_paths() -> &'static [&'static str] {
        &["name", "description"]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCategoryPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ServiceCategoryPayload {
    pub fn from_record(record: &Canonical) -> Self {
        Self {
            name: record.field_text("name"),
            description: record.field_text("description"),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name is required".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::{apply_mutation, normalize_list, MutationKind, MutationOutcome};
    use serde_json::json;

    #[test]
    fn test_create_from_wrapped_response() {
        let list = normalize_list::<ServiceCategory>(vec![json!({ "_id": "s1", "name": "Plumber" })]);
        let outcome = apply_mutation::<ServiceCategory>(
            &list,
            &json!({ "message": "Category created", "category": { "_id": "s2", "name": "Electrician" } }),
            &MutationKind::Create,
        );
        match outcome {
            MutationOutcome::Applied(out) => {
                assert_eq!(out.len(), 2);
                assert_eq!(ServiceCategoryPayload::from_record(&out[0]).name, "Electrician");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_validate() {
        assert!(ServiceCategoryPayload::default().validate().is_err());
        let payload = ServiceCategoryPayload {
            name: "Carpenter".into(),
            description: String::new(),
        };
        assert!(payload.validate().is_ok());
    }
}
