use contracts::shared::error::ApiError;
use contracts::system::auth::{AdminLoginRequest, AdminLoginResponse};

use super::session::AdminSession;
use crate::shared::http::ApiClient;

/// Login with admin id and password
pub async fn login(client: &ApiClient, request: &AdminLoginRequest) -> Result<AdminLoginResponse, ApiError> {
    let value = client.post("/api/admin/login", request).await?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Login and store the result in `session`
///
/// Returns the text for the success toast.
pub async fn do_login(session: AdminSession, admin_id: String, password: String) -> Result<String, String> {
    let request = AdminLoginRequest { admin_id, password };
    request.validate()?;

    let client = ApiClient::new(session);
    match login(&client, &request).await {
        Ok(response) => {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "Login successful".to_string());
            session.login(response);
            Ok(message)
        }
        Err(e) => Err(e.user_message("Login failed.")),
    }
}
