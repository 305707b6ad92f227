use chrono::{DateTime, Utc};

use super::codec::{SheetCodec, SheetError};
use crate::shared::list::Canonical;

/// Максимальный размер файла импорта (5 MB)
pub const MAX_IMPORT_BYTES: u64 = 5 * 1024 * 1024;

/// MIME-типы, принимаемые при импорте
pub const ACCEPTED_IMPORT_TYPES: &[&str] = &[
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
];

/// Trait для сущностей, которые можно выгрузить в таблицу
pub trait SheetExportable {
    /// Заголовки колонок
    fn headers() -> Vec<&'static str>;

    /// Данные строки, в том же порядке что и заголовки
    fn to_row(record: &Canonical) -> Vec<String>;
}

/// Encodes `records` with `codec`; an empty list is refused.
pub fn export_records<T: SheetExportable>(
    records: &[Canonical],
    codec: &dyn SheetCodec,
) -> Result<Vec<u8>, SheetError> {
    if records.is_empty() {
        return Err(SheetError::NothingToExport);
    }

    let rows: Vec<Vec<String>> = records.iter().map(T::to_row).collect();
    log::debug!("exporting {} rows as {}", rows.len(), codec.extension());
    codec.encode(&T::headers(), &rows)
}

/// `colonies_export_2025-02-01.csv`
pub fn export_file_name(prefix: &str, extension: &str, now: DateTime<Utc>) -> String {
    format!("{}_export_{}.{}", prefix, now.format("%Y-%m-%d"), extension)
}

/// Checks a picked file before it is uploaded.
///
/// Browsers sometimes report an empty MIME type for `.csv`; then the
/// extension of `file_name` decides.
pub fn validate_import_file(file_name: &str, mime: &str, size: u64) -> Result<(), SheetError> {
    let mime = mime.trim();
    let type_ok = if mime.is_empty() {
        let lower = file_name.to_lowercase();
        [".xlsx", ".xls", ".csv"].iter().any(|ext| lower.ends_with(ext))
    } else {
        ACCEPTED_IMPORT_TYPES.contains(&mime)
    };
    if !type_ok {
        return Err(SheetError::UnsupportedType(if mime.is_empty() {
            file_name.to_string()
        } else {
            mime.to_string()
        }));
    }

    if size > MAX_IMPORT_BYTES {
        return Err(SheetError::TooLarge {
            size,
            limit: MAX_IMPORT_BYTES,
        });
    }
    if size == 0 {
        return Err(SheetError::Empty);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list::{normalize_list, ListEntity};
    use crate::shared::sheet::CsvCodec;
    use chrono::TimeZone;
    use serde_json::json;

    struct Rows;

    impl ListEntity for Rows {
        fn collection_name() -> &'static str {
            "rows"
        }
        fn element_name() -> &'static str {
            "row"
        }
        fn search_paths() -> &'static [&'static str] {
            &["name"]
        }
    }

    impl SheetExportable for Rows {
        fn headers() -> Vec<&'static str> {
            vec!["Name", "Status"]
        }
        fn to_row(record: &Canonical) -> Vec<String> {
            vec![
                record.field_text("name"),
                if record.field_flag("isActive") { "Active" } else { "Inactive" }.to_string(),
            ]
        }
    }

    #[test]
    fn test_export_records() {
        let records = normalize_list::<Rows>(vec![
            json!({ "_id": "1", "name": "Green Park", "isActive": true }),
            json!({ "_id": "2", "name": "Lake View" }),
        ]);
        let bytes = export_records::<Rows>(&records, &CsvCodec).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text, "Name;Status\nGreen Park;Active\nLake View;Inactive\n");
    }

    #[test]
    fn test_export_empty_is_refused() {
        assert!(matches!(
            export_records::<Rows>(&[], &CsvCodec),
            Err(SheetError::NothingToExport)
        ));
    }

    #[test]
    fn test_export_file_name() {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 10, 30, 0).unwrap();
        assert_eq!(export_file_name("colonies", "csv", now), "colonies_export_2025-02-01.csv");
    }

    #[test]
    fn test_validate_import_file() {
        assert!(validate_import_file("a.csv", "text/csv", 1024).is_ok());
        assert!(validate_import_file("a.csv", "", 1024).is_ok());
        assert!(matches!(
            validate_import_file("a.pdf", "application/pdf", 10),
            Err(SheetError::UnsupportedType(_))
        ));
        assert!(matches!(
            validate_import_file("a.pdf", "", 10),
            Err(SheetError::UnsupportedType(_))
        ));
        assert!(matches!(
            validate_import_file("big.xlsx", ACCEPTED_IMPORT_TYPES[1], MAX_IMPORT_BYTES + 1),
            Err(SheetError::TooLarge { .. })
        ));
        assert!(validate_import_file("edge.xlsx", ACCEPTED_IMPORT_TYPES[1], MAX_IMPORT_BYTES).is_ok());
        assert!(matches!(
            validate_import_file("zero.csv", "text/csv", 0),
            Err(SheetError::Empty)
        ));
    }
}
