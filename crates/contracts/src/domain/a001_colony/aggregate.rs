use serde::{Deserialize, Serialize};

use crate::shared::list::{Canonical, FilterField, ListEntity};
use crate::shared::sheet::{ColumnDef, SheetData, SheetExportable};

// ============================================================================
// List schema
// ============================================================================

/// Колония (жилой комплекс, который обслуживают мастера)
#[derive(Debug, Clone, Copy, Default)]
pub struct Colony;

impl Colony {
    pub const CITY: FilterField = FilterField::text("city", "city");
    pub const STATUS: FilterField = FilterField::flag("status", "isActive", "active", "inactive");
}

impl ListEntity for Colony {
    fn collection_name() -> &'static str {
        "colonies"
    }

    fn element_name() -> &'static str {
        "colony"
    }

    fn search_paths() -> &'static [&'static str] {
        &["name", "address", "city", "landmark", "pincode", "description"]
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[Colony::CITY, Colony::STATUS];
        FIELDS
    }
}

impl SheetExportable for Colony {
    fn headers() -> Vec<&'static str> {
        vec![
            "Name",
            "Pincode",
            "Address",
            "City",
            "Landmark",
            "Description",
            "Status",
            "Created Date",
        ]
    }

    fn to_row(record: &Canonical) -> Vec<String> {
        let created = match record.field_text("createdAtIST") {
            s if s.is_empty() => record.field_text("createdAt"),
            s => s,
        };
        vec![
            record.field_text("name"),
            record.field_text("pincode"),
            record.field_text("address"),
            record.field_text("city"),
            record.field_text("landmark"),
            record.field_text("description"),
            if record.field_flag("isActive") {
                "Active"
            } else {
                "Inactive"
            }
            .to_string(),
            created,
        ]
    }
}

/// Колонки шаблона импорта
pub fn import_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", "Name", true),
        ColumnDef::new("pincode", "Pincode", true),
        ColumnDef::new("address", "Address", false),
        ColumnDef::new("city", "City", true),
        ColumnDef::new("landmark", "Landmark", false),
        ColumnDef::new("description", "Description", false),
    ]
}

/// Строк в предпросмотре импорта
pub const IMPORT_PREVIEW_ROWS: usize = 5;

/// Warning shown over the preview when required columns are missing in the file.
pub fn import_preview_warning(data: &SheetData) -> Option<String> {
    let missing = data.missing_required(&import_columns());
    if missing.is_empty() {
        None
    } else {
        Some(format!("Missing required columns: {}", missing.join(", ")))
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Тело запроса создания/изменения колонии
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColonyPayload {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub city: String,
    pub pincode: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for ColonyPayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            city: String::new(),
            pincode: String::new(),
            landmark: String::new(),
            description: String::new(),
            is_active: true,
        }
    }
}

impl ColonyPayload {
    /// Заполнить форму из записи списка (режим редактирования)
    pub fn from_record(record: &Canonical) -> Self {
        Self {
            name: record.field_text("name"),
            address: record.field_text("address"),
            city: record.field_text("city"),
            pincode: record.field_text("pincode"),
            landmark: record.field_text("landmark"),
            description: record.field_text("description"),
            is_active: record.field_flag("isActive"),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Colony name is required".into());
        }
        if self.city.trim().is_empty() {
            return Err("City is required".into());
        }
        if self.pincode.trim().is_empty() {
            return Err("Pincode is required".into());
        }
        Ok(())
    }
}

/// `POST /api/colonies/bulk-delete`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub colony_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::{filter, normalize_list, FilterState};
    use serde_json::json;

    fn colonies() -> Vec<Canonical> {
        normalize_list::<Colony>(vec![
            json!({ "_id": "c1", "name": "Green Park", "city": "Mumbai", "pincode": "400001", "isActive": true, "createdAt": "2025-01-10" }),
            json!({ "_id": "c2", "name": "Lake View", "city": "Pune", "pincode": 411001, "isActive": false }),
            json!({ "_id": "c3", "name": "Sunrise", "city": "Mumbai", "landmark": "Near station", "createdAtIST": "10/01/2025" }),
        ])
    }

    #[test]
    fn test_city_and_status_filters() {
        let state = FilterState::new()
            .with_selector::<Colony>("city", "Mumbai")
            .with_selector::<Colony>("status", "inactive");
        let out = filter::<Colony>(&colonies(), &state);
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c3"]);
    }

    #[test]
    fn test_search_numeric_pincode_and_landmark() {
        let list = colonies();
        assert_eq!(filter::<Colony>(&list, &FilterState::new().with_query("4110")).len(), 1);
        assert_eq!(filter::<Colony>(&list, &FilterState::new().with_query("STATION")).len(), 1);
    }

    #[test]
    fn test_export_row() {
        let list = colonies();
        assert_eq!(
            Colony::to_row(&list[0]),
            vec!["Green Park", "400001", "", "Mumbai", "", "", "Active", "2025-01-10"]
        );
        assert_eq!(Colony::to_row(&list[2])[7], "10/01/2025");
        assert_eq!(Colony::to_row(&list[1])[6], "Inactive");
        assert_eq!(Colony::headers().len(), Colony::to_row(&list[1]).len());
    }

    #[test]
    fn test_payload_validate() {
        let mut payload = ColonyPayload {
            name: "Green Park".into(),
            city: "Mumbai".into(),
            pincode: "400001".into(),
            ..Default::default()
        };
        assert!(payload.validate().is_ok());

        payload.city = "  ".into();
        assert_eq!(payload.validate(), Err("City is required".to_string()));
    }

    #[test]
    fn test_payload_wire_names() {
        let payload = ColonyPayload::from_record(&colonies()[1]);
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["isActive"], json!(false));
        assert_eq!(body["pincode"], json!("411001"));

        let req = BulkDeleteRequest {
            colony_ids: vec!["c1".into()],
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "colonyIds": ["c1"] }));
    }

    #[test]
    fn test_import_preview_warning() {
        fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
        }

        let full = SheetData::from_raw(
            raw(&[&["Name", "Pincode", "City"], &["Green Park", "400001", "Mumbai"]]),
            &import_columns(),
            "colonies.csv",
        )
        .unwrap();
        assert_eq!(import_preview_warning(&full), None);

        let partial = SheetData::from_raw(
            raw(&[&["Name", "Landmark"], &["Green Park", "Near station"]]),
            &import_columns(),
            "colonies.csv",
        )
        .unwrap();
        assert_eq!(
            import_preview_warning(&partial).as_deref(),
            Some("Missing required columns: Pincode, City")
        );
    }
}
