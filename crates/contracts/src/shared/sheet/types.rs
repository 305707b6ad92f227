use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::codec::SheetError;

/// Определение колонки для импорта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Техническое имя поля (ключ в payload)
    pub field_name: String,
    /// Заголовок колонки в файле
    pub title: String,
    pub required: bool,
}

impl ColumnDef {
    pub fn new(field_name: &str, title: &str, required: bool) -> Self {
        Self {
            field_name: field_name.to_string(),
            title: title.to_string(),
            required,
        }
    }
}

/// Метаданные прочитанного файла
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub columns: Vec<String>,
    /// Строки данных без заголовка
    pub row_count: usize,
    pub file_name: String,
}

/// Статус сопоставления колонки
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub expected: String,
    /// Заголовок, найденный в файле
    pub found: Option<String>,
    pub file_index: Option<usize>,
}

/// Результат разбора файла импорта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetData {
    pub metadata: SheetMetadata,
    /// field_name -> значение
    pub rows: Vec<HashMap<String, String>>,
    pub column_mapping: Vec<ColumnMapping>,
    pub file_headers: Vec<String>,
}

impl SheetData {
    /// Собрать из сырых строк (первая строка - заголовки)
    ///
    /// Headers match by case-insensitive title first, then by containment
    /// either way. Rows where every mapped cell is blank are skipped.
    pub fn from_raw(
        raw: Vec<Vec<String>>,
        columns: &[ColumnDef],
        file_name: &str,
    ) -> Result<Self, SheetError> {
        let Some(headers) = raw.first() else {
            return Err(SheetError::Empty);
        };
        let file_headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let lowered: Vec<String> = file_headers.iter().map(|h| h.to_lowercase()).collect();

        let column_mapping: Vec<ColumnMapping> = columns
            .iter()
            .map(|col| {
                let title = col.title.trim().to_lowercase();
                let index = lowered.iter().position(|h| *h == title).or_else(|| {
                    lowered
                        .iter()
                        .position(|h| !h.is_empty() && (h.contains(&title) || title.contains(h.as_str())))
                });
                ColumnMapping {
                    expected: col.title.clone(),
                    found: index.map(|i| file_headers[i].clone()),
                    file_index: index,
                }
            })
            .collect();

        let mut rows = Vec::new();
        for row in raw.iter().skip(1) {
            let row_data: HashMap<String, String> = columns
                .iter()
                .zip(&column_mapping)
                .map(|(col, mapping)| {
                    let value = mapping
                        .file_index
                        .and_then(|i| row.get(i))
                        .map(|v| v.trim().to_string())
                        .unwrap_or_default();
                    (col.field_name.clone(), value)
                })
                .collect();

            if row_data.values().any(|v| !v.is_empty()) {
                rows.push(row_data);
            }
        }

        Ok(Self {
            metadata: SheetMetadata {
                columns: columns.iter().map(|c| c.field_name.clone()).collect(),
                row_count: rows.len(),
                file_name: file_name.to_string(),
            },
            rows,
            column_mapping,
            file_headers,
        })
    }

    /// Первые `n` строк для предпросмотра
    pub fn preview(&self, n: usize) -> &[HashMap<String, String>] {
        &self.rows[..self.rows.len().min(n)]
    }

    pub fn has_all_columns_mapped(&self) -> bool {
        self.column_mapping.iter().all(|m| m.found.is_some())
    }

    pub fn unmapped_count(&self) -> usize {
        self.column_mapping.iter().filter(|m| m.found.is_none()).count()
    }

    /// Required columns that were not found in the file.
    pub fn missing_required(&self, columns: &[ColumnDef]) -> Vec<String> {
        columns
            .iter()
            .zip(&self.column_mapping)
            .filter(|(col, m)| col.required && m.found.is_none())
            .map(|(col, _)| col.title.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name", "Name", true),
            ColumnDef::new("city", "City", true),
            ColumnDef::new("pincode", "Pincode", true),
            ColumnDef::new("landmark", "Landmark", false),
        ]
    }

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_mapping_exact_and_similar() {
        let data = SheetData::from_raw(
            raw(&[
                &["NAME", "City Name", "Pincode"],
                &["Green Park", "Mumbai", "400001"],
                &["", "", ""],
                &["Sunrise", "Pune"],
            ]),
            &columns(),
            "colonies.xlsx",
        )
        .unwrap();

        assert_eq!(data.column_mapping[0].found.as_deref(), Some("NAME"));
        assert_eq!(data.column_mapping[1].found.as_deref(), Some("City Name"));
        assert_eq!(data.column_mapping[3].found, None);
        assert_eq!(data.unmapped_count(), 1);
        assert!(!data.has_all_columns_mapped());
        assert!(data.missing_required(&columns()).is_empty());

        assert_eq!(data.metadata.row_count, 2);
        assert_eq!(data.rows[1]["pincode"], "");
        assert_eq!(data.rows[1]["city"], "Pune");
        assert_eq!(data.preview(5).len(), 2);
        assert_eq!(data.preview(1)[0]["name"], "Green Park");
    }

    #[test]
    fn test_missing_required() {
        let data = SheetData::from_raw(raw(&[&["Name"], &["X"]]), &columns(), "x.csv").unwrap();
        assert_eq!(data.missing_required(&columns()), vec!["City", "Pincode"]);
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(
            SheetData::from_raw(Vec::new(), &columns(), "x.csv"),
            Err(SheetError::Empty)
        ));
    }
}
