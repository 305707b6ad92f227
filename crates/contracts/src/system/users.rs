use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::list::{distinct_values, Canonical, FilterField, ListEntity};

/// Роль пользователя по умолчанию
pub const ROLE_MEMBER: &str = "society member";
/// Мастер; для него обязательна категория услуг
pub const ROLE_SERVICE: &str = "society service";

// ============================================================================
// List schemas
// ============================================================================

/// Пользователь приложения (жители и мастера)
#[derive(Debug, Clone, Copy, Default)]
pub struct User;

impl User {
    pub const ROLE: FilterField = FilterField::text_folded("role", "role");
    pub const SERVICE_CATEGORY: FilterField = FilterField::text("serviceCategory", "serviceCategory");
    pub const BLOCKED: FilterField = FilterField::flag("blocked", "isBlocked", "blocked", "active");
}

impl ListEntity for User {
    fn collection_name() -> &'static str {
        "users"
    }

    fn element_name() -> &'static str {
        "user"
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "fullName",
            "email",
            "mobileNumber",
            "whatsappNumber",
            "role",
            "serviceCategory",
            "registrationID",
            "pincode",
        ]
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[User::ROLE, User::SERVICE_CATEGORY, User::BLOCKED];
        FIELDS
    }
}

/// Мастера с включенным срочным (tatkal) выездом
///
/// Same wire shape as [`User`]; only enabled, unblocked users are ever shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TatkalUser;

impl ListEntity for TatkalUser {
    fn collection_name() -> &'static str {
        "users"
    }

    fn element_name() -> &'static str {
        "user"
    }

    fn list_name() -> &'static str {
        "tatkal users"
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "fullName",
            "email",
            "mobileNumber",
            "whatsappNumber",
            "serviceCategory",
            "pincode",
            "registrationID",
        ]
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[User::SERVICE_CATEGORY, User::ROLE];
        FIELDS
    }

    fn admits(record: &Canonical) -> bool {
        record.field_flag("tatkalEnabled") && !record.field_flag("isBlocked")
    }
}

/// Варианты фильтра категорий: сначала из справочника, потом встреченные у пользователей
pub fn service_category_options(categories: &[Canonical], users: &[Canonical]) -> Vec<String> {
    let names = categories.iter().map(|c| &c.raw);
    let used = users.iter().map(|u| &u.raw);
    let mut out = distinct_values(names, "name");
    for value in distinct_values(used, "serviceCategory") {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

// ============================================================================
// Payloads
// ============================================================================

/// Форма пользователя (регистрация и редактирование)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub full_name: String,
    pub mobile_number: String,
    #[serde(default)]
    pub whatsapp_number: String,
    pub email: String,
    /// Only sent on registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub pincode: String,
    pub role: String,
    #[serde(default)]
    pub service_category: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub adhar_card: String,
    #[serde(default)]
    pub service_charge: String,
    #[serde(default)]
    pub per_hour_charge: String,
    #[serde(default)]
    pub tatkal_enabled: bool,
}

impl Default for UserPayload {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            mobile_number: String::new(),
            whatsapp_number: String::new(),
            email: String::new(),
            password: None,
            address: String::new(),
            pincode: String::new(),
            role: ROLE_MEMBER.to_string(),
            service_category: String::new(),
            experience: String::new(),
            adhar_card: String::new(),
            service_charge: String::new(),
            per_hour_charge: String::new(),
            tatkal_enabled: false,
        }
    }
}

impl UserPayload {
    /// Edit form; the password is never prefilled.
    pub fn from_record(record: &Canonical) -> Self {
        let role = match record.field_text("role") {
            r if r.is_empty() => ROLE_MEMBER.to_string(),
            r => r,
        };
        Self {
            full_name: record.field_text("fullName"),
            mobile_number: record.field_text("mobileNumber"),
            whatsapp_number: record.field_text("whatsappNumber"),
            email: record.field_text("email"),
            password: None,
            address: record.field_text("address"),
            pincode: record.field_text("pincode"),
            role,
            service_category: record.field_text("serviceCategory"),
            experience: record.field_text("experience"),
            adhar_card: record.field_text("adharCard"),
            service_charge: record.field_text("serviceCharge"),
            per_hour_charge: record.field_text("perHourCharge"),
            tatkal_enabled: record.field_flag("tatkalEnabled"),
        }
    }

    /// Switching away from the service role clears the service-only fields.
    pub fn set_role(&mut self, role: &str) {
        self.role = role.to_string();
        if role != ROLE_SERVICE {
            self.service_category.clear();
            self.experience.clear();
            self.service_charge.clear();
            self.per_hour_charge.clear();
        }
    }

    pub fn validate(&self, creating: bool) -> Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("Full name is required".into());
        }
        if self.mobile_number.trim().is_empty() {
            return Err("Mobile number is required".into());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".into());
        }
        if creating && self.password.as_deref().map_or(true, |p| p.trim().is_empty()) {
            return Err("Password is required for new user".into());
        }
        if self.role == ROLE_SERVICE && self.service_category.trim().is_empty() {
            return Err("Service category is required for society service".into());
        }
        Ok(())
    }

    /// Body as sent to the server: WhatsApp falls back to the mobile number,
    /// and the password is dropped for updates.
    pub fn to_request(&self, creating: bool) -> Self {
        let mut out = self.clone();
        if out.whatsapp_number.trim().is_empty() {
            out.whatsapp_number = out.mobile_number.clone();
        }
        if !creating {
            out.password = None;
        }
        out
    }
}

/// `PATCH /api/users/:id/block`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatusRequest {
    pub is_blocked: bool,
}

impl BlockStatusRequest {
    /// Поля, которые применяются к записи, если сервер их не вернул
    pub fn requested_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("isBlocked".to_string(), Value::Bool(self.is_blocked));
        fields
    }

    pub fn success_text(&self) -> &'static str {
        if self.is_blocked {
            "User blocked successfully"
        } else {
            "User unblocked successfully"
        }
    }
}

/// `GET /api/users/:id/details`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetails {
    pub user: Value,
    pub availability: Vec<Value>,
    pub holidays: Vec<Value>,
    pub templates: Vec<Value>,
    pub has_active_holiday: bool,
    pub has_templates: bool,
}
