use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::list::{Canonical, ListEntity};

/// Главная категория, объединяющая несколько категорий услуг
///
/// `serviceCategories` may hold populated objects or bare ids; both are kept
/// after normalization, objects get their `id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainCategory;

impl ListEntity for MainCategory {
    fn collection_name() -> &'static str {
        "mainCategories"
    }

    fn element_name() -> &'static str {
        "mainCategory"
    }

    fn list_name() -> &'static str {
        "main categories"
    }

    fn search_paths() -> &'static [&'static str] {
        &["name", "description", "serviceCategories[].name"]
    }

    fn nested_relations() -> &'static [&'static str] {
        &["serviceCategories"]
    }
}

impl MainCategory {
    /// Ids of the linked service categories, whether populated or not.
    pub fn service_category_ids(record: &Canonical) -> Vec<String> {
        record
            .raw
            .get("serviceCategories")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(id) => Some(id.clone()),
                        other => other.get("id").and_then(Value::as_str).map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCategoryPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub service_category_ids: Vec<String>,
}

impl MainCategoryPayload {
    pub fn from_record(record: &Canonical) -> Self {
        Self {
            name: record.field_text("name"),
            description: record.field_text("description"),
            service_category_ids: MainCategory::service_category_ids(record),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Main category name is required".into());
        }
        Ok(())
    }

    /// Copy with trimmed text fields, as sent to the server
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            service_category_ids: self.service_category_ids.clone(),
        }
    }

    pub fn toggle_category(&mut self, id: &str) {
        match self.service_category_ids.iter().position(|c| c == id) {
            Some(index) => {
                self.service_category_ids.remove(index);
            }
            None => self.service_category_ids.push(id.to_string()),
        }
    }
}
