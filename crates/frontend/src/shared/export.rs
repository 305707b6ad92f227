/// Скачивание файлов в браузере и клиентский экспорт списков
use chrono::Utc;
use contracts::shared::list::Canonical;
use contracts::shared::sheet::{export_file_name, export_records, CsvCodec, SheetCodec, SheetExportable};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Экспортирует записи в CSV и инициирует скачивание; возвращает имя файла
pub fn export_to_csv<T: SheetExportable>(records: &[Canonical], prefix: &str) -> Result<String, String> {
    let codec = CsvCodec;
    let bytes = export_records::<T>(records, &codec).map_err(|e| e.user_message())?;
    let filename = export_file_name(prefix, codec.extension(), Utc::now());
    download_bytes(&bytes, codec.content_type(), &filename)?;
    Ok(filename)
}

/// Инициирует скачивание произвольных байтов через браузер
pub fn download_bytes(bytes: &[u8], content_type: &str, filename: &str) -> Result<(), String> {
    let blob = create_blob(bytes, content_type)?;
    download_blob(&blob, filename)
}

fn create_blob(bytes: &[u8], content_type: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(content_type);

    Blob::new_with_u8_array_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}
