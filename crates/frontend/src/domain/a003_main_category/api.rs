use contracts::domain::a003_main_category::{MainCategory, MainCategoryPayload};
use contracts::shared::error::ApiError;
use contracts::shared::list::RecordId;
use serde_json::Value;

use crate::shared::api_utils::id_segment;
use crate::shared::http::ApiClient;
use crate::shared::list_controller::{FormTexts, ListController, ListSource, Notice};

impl ListSource for MainCategory {
    /// Active and inactive ones
    fn list_path() -> &'static str {
        "/api/main-categories/admin/all/list"
    }

    fn texts() -> FormTexts {
        FormTexts {
            created: "Main category created successfully",
            updated: "Main category updated successfully",
            deleted: "Main category deleted successfully",
            save_failed: "Failed to save main category.",
            delete_failed: "Failed to delete main category.",
        }
    }
}

/// Text fields are sent trimmed
pub async fn create_main_category(client: &ApiClient, payload: &MainCategoryPayload) -> Result<Value, ApiError> {
    client.post("/api/main-categories", &payload.trimmed()).await
}

pub async fn update_main_category(
    client: &ApiClient,
    id: &RecordId,
    payload: &MainCategoryPayload,
) -> Result<Value, ApiError> {
    client
        .put(
            &format!("/api/main-categories/{}", id_segment(id.as_str())),
            &payload.trimmed(),
        )
        .await
}

/// Soft delete on the server; the record leaves the admin list all the same
pub async fn delete_main_category(client: &ApiClient, id: &RecordId) -> Result<Value, ApiError> {
    client
        .delete(&format!("/api/main-categories/{}", id_segment(id.as_str())))
        .await
}

pub async fn save_main_category(
    controller: ListController<MainCategory>,
    editing: Option<RecordId>,
    payload: MainCategoryPayload,
) -> bool {
    if let Err(msg) = payload.validate() {
        controller.notify(Notice::error(msg));
        return false;
    }
    let client = controller.client();
    let result = match &editing {
        None => create_main_category(&client, &payload).await,
        Some(id) => update_main_category(&client, id, &payload).await,
    };
    controller.complete_save(result, editing)
}

pub async fn remove_main_category(controller: ListController<MainCategory>, id: RecordId) -> bool {
    let result = delete_main_category(&controller.client(), &id).await;
    controller.complete_delete(result, id)
}
