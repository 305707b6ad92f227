use chrono::Utc;
use contracts::domain::a001_colony::{
    import_columns, import_preview_warning, BulkDeleteRequest, Colony, ColonyPayload, IMPORT_PREVIEW_ROWS,
};
use contracts::shared::error::ApiError;
use contracts::shared::list::{Canonical, ImportReport, MutationKind, RecordId};
use contracts::shared::sheet::{validate_import_file, SheetData, SheetError};
use web_sys::FormData;

use crate::shared::api_utils::id_segment;
use crate::shared::excel_importer::read_import_file;
use crate::shared::export::{download_bytes, export_to_csv};
use crate::shared::http::ApiClient;
use crate::shared::list_controller::{FormTexts, ListController, ListSource, Notice};

const XLSX_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

impl ListSource for Colony {
    fn list_path() -> &'static str {
        "/api/colonies"
    }

    fn texts() -> FormTexts {
        FormTexts {
            created: "Colony created successfully",
            updated: "Colony updated successfully",
            deleted: "Colony deleted successfully",
            save_failed: "Failed to save colony.",
            delete_failed: "Failed to delete colony.",
        }
    }
}

pub async fn create_colony(client: &ApiClient, payload: &ColonyPayload) -> Result<serde_json::Value, ApiError> {
    client.post("/api/colonies", payload).await
}

pub async fn update_colony(
    client: &ApiClient,
    id: &RecordId,
    payload: &ColonyPayload,
) -> Result<serde_json::Value, ApiError> {
    client
        .put(&format!("/api/colonies/{}", id_segment(id.as_str())), payload)
        .await
}

pub async fn delete_colony(client: &ApiClient, id: &RecordId) -> Result<serde_json::Value, ApiError> {
    client
        .delete(&format!("/api/colonies/{}", id_segment(id.as_str())))
        .await
}

pub async fn bulk_delete_colonies(client: &ApiClient, ids: &[RecordId]) -> Result<serde_json::Value, ApiError> {
    let request = BulkDeleteRequest {
        colony_ids: ids.iter().map(|id| id.to_string()).collect(),
    };
    client.post("/api/colonies/bulk-delete", &request).await
}

/// Скачать шаблон импорта
pub async fn download_template(client: &ApiClient) -> Result<(), String> {
    let bytes = client
        .download("/api/colonies/download-template")
        .await
        .map_err(|e| e.user_message("Failed to download template"))?;
    let filename = format!("colony_import_template_{}.xlsx", Utc::now().timestamp_millis());
    download_bytes(&bytes, XLSX_TYPE, &filename)
}

/// Upload a spreadsheet for bulk import; check it with [`import_file_error`] first.
pub async fn import_colonies(client: &ApiClient, file: web_sys::File) -> Result<ImportReport, ApiError> {
    let form = FormData::new().map_err(|e| ApiError::Decode(format!("{:?}", e)))?;
    form.append_with_blob("file", &file)
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

    let value = client.post_form("/api/colonies/import", form).await?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Выгрузка колоний: сначала серверный экспорт, при ошибке CSV на клиенте
///
/// Returns the name of the downloaded file.
pub async fn export_colonies(client: &ApiClient, records: &[Canonical]) -> Result<String, String> {
    match client.download("/api/colonies/export").await {
        Ok(bytes) => {
            let filename = format!("colonies_export_{}.xlsx", Utc::now().timestamp_millis());
            download_bytes(&bytes, XLSX_TYPE, &filename)?;
            Ok(filename)
        }
        Err(e) => {
            log::info!("server export unavailable ({}), using client-side export", e);
            export_to_csv::<Colony>(records, "colonies")
        }
    }
}

/// Ошибка проверки файла как текст уведомления
pub fn import_file_error(file: &web_sys::File) -> Option<String> {
    validate_import_file(&file.name(), &file.type_(), file.size() as u64)
        .err()
        .map(|e: SheetError| e.user_message())
}

// ============================================================================
// Page actions
// ============================================================================

/// Validate, send and apply; `true` when the form can close.
pub async fn save_colony(controller: ListController<Colony>, editing: Option<RecordId>, payload: ColonyPayload) -> bool {
    if let Err(msg) = payload.validate() {
        controller.notify(Notice::error(msg));
        return false;
    }
    let client = controller.client();
    let result = match &editing {
        None => create_colony(&client, &payload).await,
        Some(id) => update_colony(&client, id, &payload).await,
    };
    controller.complete_save(result, editing)
}

pub async fn remove_colony(controller: ListController<Colony>, id: RecordId) -> bool {
    let result = delete_colony(&controller.client(), &id).await;
    controller.complete_delete(result, id)
}

pub async fn remove_colonies(controller: ListController<Colony>, ids: Vec<RecordId>) -> bool {
    if ids.is_empty() {
        return false;
    }
    let count = ids.len();
    let result = bulk_delete_colonies(&controller.client(), &ids).await;
    controller.complete(
        result,
        MutationKind::DeleteMany { ids },
        &format!("{} colonies deleted successfully", count),
        "Failed to delete colonies.",
    )
}

/// Reads the picked file for the preview dialog before it is uploaded.
///
/// Problems go to the notices; `None` means there is nothing to preview.
pub async fn preview_import(controller: ListController<Colony>, file: web_sys::File) -> Option<SheetData> {
    match read_import_file(file, &import_columns()).await {
        Ok(data) => {
            log::debug!(
                "{}: previewing {} of {} rows",
                data.metadata.file_name,
                data.preview(IMPORT_PREVIEW_ROWS).len(),
                data.rows.len()
            );
            if let Some(msg) = import_preview_warning(&data) {
                controller.notify(Notice::warning(msg));
            }
            Some(data)
        }
        Err(e) => {
            controller.notify(Notice::error(e.user_message()));
            None
        }
    }
}

pub async fn import_file(controller: ListController<Colony>, file: web_sys::File) -> bool {
    if let Some(msg) = import_file_error(&file) {
        controller.notify(Notice::error(msg));
        return false;
    }
    let result = import_colonies(&controller.client(), file).await;
    controller.complete_import(result)
}

/// Exports what the page currently shows.
pub async fn export_visible(controller: ListController<Colony>) {
    let records = controller.visible();
    if records.is_empty() {
        controller.notify(Notice::error("No colonies to export"));
        return;
    }
    match export_colonies(&controller.client(), &records).await {
        Ok(_) => controller.notify(Notice::success(format!(
            "Exported {} colonies successfully",
            records.len()
        ))),
        Err(msg) => controller.notify(Notice::error(msg)),
    }
}

pub async fn fetch_template(controller: ListController<Colony>) {
    match download_template(&controller.client()).await {
        Ok(()) => controller.notify(Notice::success("Template downloaded successfully")),
        Err(msg) => controller.notify(Notice::error(msg)),
    }
}
