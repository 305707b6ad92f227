use contracts::domain::a004_slider::{Slider, SliderPayload, SLIDER_IMAGE_FIELD};
use contracts::shared::error::ApiError;
use contracts::shared::list::RecordId;
use serde_json::Value;
use web_sys::FormData;

use crate::shared::api_utils::id_segment;
use crate::shared::http::ApiClient;
use crate::shared::list_controller::{FormTexts, ListController, ListSource, Notice};

impl ListSource for Slider {
    fn list_path() -> &'static str {
        "/api/sliders/all"
    }

    fn texts() -> FormTexts {
        FormTexts {
            created: "Slider created successfully",
            updated: "Slider updated successfully",
            deleted: "Slider deleted successfully",
            save_failed: "Failed to save slider.",
            delete_failed: "Failed to delete slider.",
        }
    }
}

fn build_form(payload: &SliderPayload, image: Option<&web_sys::File>) -> Result<FormData, ApiError> {
    let to_err = |e: wasm_bindgen::JsValue| ApiError::Decode(format!("{:?}", e));

    let form = FormData::new().map_err(to_err)?;
    if let Some(file) = image {
        form.append_with_blob(SLIDER_IMAGE_FIELD, file).map_err(to_err)?;
    }
    for (name, value) in payload.form_fields() {
        form.append_with_str(name, &value).map_err(to_err)?;
    }
    Ok(form)
}

/// Image is required here; `payload.validate(true, ..)` checks it.
pub async fn create_slider(
    client: &ApiClient,
    payload: &SliderPayload,
    image: Option<&web_sys::File>,
) -> Result<Value, ApiError> {
    let form = build_form(payload, image)?;
    client.post_form("/api/sliders", form).await
}

/// Without a new image the current one is kept
pub async fn update_slider(
    client: &ApiClient,
    id: &RecordId,
    payload: &SliderPayload,
    image: Option<&web_sys::File>,
) -> Result<Value, ApiError> {
    let form = build_form(payload, image)?;
    client
        .put_form(&format!("/api/sliders/{}", id_segment(id.as_str())), form)
        .await
}

pub async fn delete_slider(client: &ApiClient, id: &RecordId) -> Result<Value, ApiError> {
    client
        .delete(&format!("/api/sliders/{}", id_segment(id.as_str())))
        .await
}

pub async fn save_slider(
    controller: ListController<Slider>,
    editing: Option<RecordId>,
    payload: SliderPayload,
    image: Option<web_sys::File>,
) -> bool {
    if let Err(msg) = payload.validate(editing.is_none(), image.is_some()) {
        controller.notify(Notice::error(msg));
        return false;
    }
    let client = controller.client();
    let result = match &editing {
        None => create_slider(&client, &payload, image.as_ref()).await,
        Some(id) => update_slider(&client, id, &payload, image.as_ref()).await,
    };
    controller.complete_save(result, editing)
}

pub async fn remove_slider(controller: ListController<Slider>, id: RecordId) -> bool {
    let result = delete_slider(&controller.client(), &id).await;
    controller.complete_delete(result, id)
}
