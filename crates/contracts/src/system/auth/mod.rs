use serde::{Deserialize, Serialize};

/// `POST /api/admin/login`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    pub admin_id: String,
    pub password: String,
}

impl AdminLoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.admin_id.trim().is_empty() || self.password.is_empty() {
            return Err("Admin ID and password are required".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub admin: AdminInfo,
    pub token: String,
}

/// Данные администратора, сохраняемые вместе с токеном
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub admin_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "_id")]
    pub id: String,
}

impl AdminInfo {
    /// Name for the header; falls back to the login id
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.admin_id
        } else {
            &self.name
        }
    }
}
