use contracts::shared::sheet::{
    validate_import_file, ColumnDef, CsvCodec, SheetCodec, SheetData, SheetError,
};
use wasm_bindgen::prelude::*;

/// JS binding для парсинга Excel файлов через SheetJS
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = parseExcelFile, catch)]
    fn parse_excel_file(data: &[u8]) -> Result<JsValue, JsValue>;
}

/// `.xlsx`/`.xls` через SheetJS; запись не поддерживается
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetJsCodec;

impl SheetCodec for SheetJsCodec {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>, SheetError> {
        let result =
            parse_excel_file(bytes).map_err(|e| SheetError::Malformed(format!("{:?}", e)))?;
        parse_js_array_to_vec(result)
    }

    fn encode(&self, _headers: &[&str], _rows: &[Vec<String>]) -> Result<Vec<u8>, SheetError> {
        Err(SheetError::UnsupportedType(self.content_type().to_string()))
    }
}

/// Reads the picked file into a preview table mapped onto `columns`.
///
/// The file is checked (type, size) before it is read.
pub async fn read_import_file(file: web_sys::File, columns: &[ColumnDef]) -> Result<SheetData, SheetError> {
    let name = file.name();
    validate_import_file(&name, &file.type_(), file.size() as u64)?;

    let bytes = read_bytes(&file).await?;
    let rows = if name.to_lowercase().ends_with(".csv") {
        CsvCodec.decode(&bytes)?
    } else {
        SheetJsCodec.decode(&bytes)?
    };
    log::debug!("{}: {} rows read", name, rows.len());

    SheetData::from_raw(rows, columns, &name)
}

async fn read_bytes(file: &web_sys::File) -> Result<Vec<u8>, SheetError> {
    use wasm_bindgen_futures::JsFuture;

    let array_buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| SheetError::Malformed(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&array_buffer).to_vec())
}

/// Конвертирует JS Array в Rust Vec<Vec<String>>
fn parse_js_array_to_vec(js_value: JsValue) -> Result<Vec<Vec<String>>, SheetError> {
    if !js_value.is_array() {
        return Err(SheetError::Malformed("parser did not return an array".to_string()));
    }

    let array = js_sys::Array::from(&js_value);
    let mut result = Vec::new();

    for row_value in array.iter() {
        if !row_value.is_array() {
            continue;
        }

        let row = js_sys::Array::from(&row_value)
            .iter()
            .map(|cell| {
                if cell.is_null() || cell.is_undefined() {
                    String::new()
                } else if let Some(n) = cell.as_f64() {
                    format_number(n)
                } else {
                    cell.as_string()
                        .unwrap_or_else(|| format!("{:?}", cell).trim_matches('"').to_string())
                }
            })
            .collect();
        result.push(row);
    }

    if result.is_empty() {
        return Err(SheetError::Empty);
    }
    Ok(result)
}

/// Pincodes come back from SheetJS as numbers: `411001`, not `411001.0`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
