use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::list::{Canonical, FilterField, ListEntity};

/// Баннер на главном экране приложения
#[derive(Debug, Clone, Copy, Default)]
pub struct Slider;

impl Slider {
    pub const STATUS: FilterField = FilterField::flag("status", "isActive", "active", "inactive");
}

impl ListEntity for Slider {
    fn collection_name() -> &'static str {
        "sliders"
    }

    fn element_name() -> &'static str {
        "slider"
    }

    fn search_paths() -> &'static [&'static str] {
        &["title", "description", "targetUrl", "sortOrder"]
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[Slider::STATUS];
        FIELDS
    }
}

/// Текстовые поля формы слайдера; картинка передается отдельно (multipart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub sort_order: i64,
    pub is_active: bool,
}

impl Default for SliderPayload {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            target_url: String::new(),
            sort_order: 0,
            is_active: true,
        }
    }
}

impl SliderPayload {
    pub fn from_record(record: &Canonical) -> Self {
        let sort_order = match record.raw.get("sortOrder") {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        };
        Self {
            title: record.field_text("title"),
            description: record.field_text("description"),
            target_url: record.field_text("targetUrl"),
            sort_order,
            is_active: record.field_flag("isActive"),
        }
    }

    /// An image is mandatory only when the slider is created.
    pub fn validate(&self, creating: bool, has_image: bool) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".into());
        }
        if creating && !has_image {
            return Err("Slider image is required".into());
        }
        Ok(())
    }

    /// Multipart text parts, in the order the server reads them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("targetUrl", self.target_url.clone()),
            ("sortOrder", self.sort_order.to_string()),
            ("isActive", self.is_active.to_string()),
        ]
    }
}

/// Имя поля файла в multipart-запросе
pub const SLIDER_IMAGE_FIELD: &str = "sliderImage";
