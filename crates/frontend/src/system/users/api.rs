use contracts::shared::error::ApiError;
use contracts::shared::list::{MutationKind, RecordId};
use contracts::system::users::{BlockStatusRequest, TatkalUser, User, UserDetails, UserPayload};
use serde_json::Value;

use crate::shared::api_utils::id_segment;
use crate::shared::http::ApiClient;
use crate::shared::list_controller::{FormTexts, ListController, ListSource, Notice};

impl ListSource for User {
    fn list_path() -> &'static str {
        "/api/users"
    }

    fn texts() -> FormTexts {
        FormTexts {
            created: "User registered successfully",
            updated: "User updated successfully",
            deleted: "User deleted successfully",
            save_failed: "Failed to save user.",
            delete_failed: "Failed to delete user.",
        }
    }
}

impl ListSource for TatkalUser {
    fn list_path() -> &'static str {
        "/api/users/tatkal"
    }
}

fn user_path(id: &RecordId) -> String {
    format!("/api/users/{}", id_segment(id.as_str()))
}

/// Register a new user (admin form)
pub async fn register_user(client: &ApiClient, payload: &UserPayload) -> Result<Value, ApiError> {
    client.post("/api/users/register", &payload.to_request(true)).await
}

/// Update user; the password is never sent from here
pub async fn update_user(client: &ApiClient, id: &RecordId, payload: &UserPayload) -> Result<Value, ApiError> {
    client.put(&user_path(id), &payload.to_request(false)).await
}

pub async fn delete_user(client: &ApiClient, id: &RecordId) -> Result<Value, ApiError> {
    client.delete(&user_path(id)).await
}

pub async fn set_block_status(
    client: &ApiClient,
    id: &RecordId,
    request: BlockStatusRequest,
) -> Result<Value, ApiError> {
    client.patch(&format!("{}/block", user_path(id)), &request).await
}

/// Profile with availability, holidays and templates
pub async fn fetch_user_details(client: &ApiClient, id: &RecordId) -> Result<UserDetails, ApiError> {
    let value = client.get(&format!("{}/details", user_path(id))).await?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Block or unblock and update the row in place.
///
/// The row gets the requested status when the server does not echo it back.
pub async fn toggle_block(controller: ListController<User>, id: RecordId, currently_blocked: bool) -> bool {
    let request = BlockStatusRequest {
        is_blocked: !currently_blocked,
    };
    let result = set_block_status(&controller.client(), &id, request).await;
    controller.complete(
        result,
        MutationKind::Patch {
            id,
            fields: request.requested_fields(),
        },
        request.success_text(),
        "Failed to update block status.",
    )
}

pub async fn save_user(controller: ListController<User>, editing: Option<RecordId>, payload: UserPayload) -> bool {
    if let Err(msg) = payload.validate(editing.is_none()) {
        controller.notify(Notice::error(msg));
        return false;
    }
    let client = controller.client();
    let result = match &editing {
        None => register_user(&client, &payload).await,
        Some(id) => update_user(&client, id, &payload).await,
    };
    controller.complete_save(result, editing)
}

pub async fn remove_user(controller: ListController<User>, id: RecordId) -> bool {
    let result = delete_user(&controller.client(), &id).await;
    controller.complete_delete(result, id)
}
