use contracts::domain::a002_service_category::{ServiceCategory, ServiceCategoryPayload};
use contracts::shared::error::ApiError;
use contracts::shared::list::RecordId;
use serde_json::Value;

use crate::shared::api_utils::id_segment;
use crate::shared::http::ApiClient;
use crate::shared::list_controller::{FormTexts, ListController, ListSource, Notice};

impl ListSource for ServiceCategory {
    fn list_path() -> &'static str {
        "/api/service-category"
    }

    fn texts() -> FormTexts {
        FormTexts {
            created: "Category created successfully",
            updated: "Category updated successfully",
            deleted: "Category deleted successfully",
            save_failed: "Failed to save category.",
            delete_failed: "Failed to delete category.",
        }
    }
}

pub async fn create_category(client: &ApiClient, payload: &ServiceCategoryPayload) -> Result<Value, ApiError> {
    client.post("/api/service-category", payload).await
}

pub async fn update_category(
    client: &ApiClient,
    id: &RecordId,
    payload: &ServiceCategoryPayload,
) -> Result<Value, ApiError> {
    client
        .put(&format!("/api/service-category/{}", id_segment(id.as_str())), payload)
        .await
}

pub async fn delete_category(client: &ApiClient, id: &RecordId) -> Result<Value, ApiError> {
    client
        .delete(&format!("/api/service-category/{}", id_segment(id.as_str())))
        .await
}

pub async fn save_category(
    controller: ListController<ServiceCategory>,
    editing: Option<RecordId>,
    payload: ServiceCategoryPayload,
) -> bool {
    if let Err(msg) = payload.validate() {
        controller.notify(Notice::error(msg));
        return false;
    }
    let client = controller.client();
    let result = match &editing {
        None => create_category(&client, &payload).await,
        Some(id) => update_category(&client, id, &payload).await,
    };
    controller.complete_save(result, editing)
}

pub async fn remove_category(controller: ListController<ServiceCategory>, id: RecordId) -> bool {
    let result = delete_category(&controller.client(), &id).await;
    controller.complete_delete(result, id)
}
