use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("file is empty")]
    Empty,
    #[error("file is not a valid spreadsheet: {0}")]
    Malformed(String),
    #[error("unsupported file type '{0}', expected .xlsx, .xls or .csv")]
    UnsupportedType(String),
    #[error("file is {size} bytes, the limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
    #[error("nothing to export")]
    NothingToExport,
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl SheetError {
    /// Text for the toast shown next to the import button.
    pub fn user_message(&self) -> String {
        match self {
            SheetError::UnsupportedType(_) => "Please select an Excel file (.xlsx, .xls, .csv)".to_string(),
            SheetError::TooLarge { .. } => "File size should be less than 5MB".to_string(),
            SheetError::Empty => "Please select a file first".to_string(),
            SheetError::NothingToExport => "No records to export".to_string(),
            other => other.to_string(),
        }
    }
}

/// Reads and writes a single-sheet table of strings.
pub trait SheetCodec {
    /// MIME type of the produced file
    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Rows of cells, header row included.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>, SheetError>;

    fn encode(&self, headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, SheetError>;
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV with `;` separators and a UTF-8 BOM, which Excel opens without an import dialog.
///
/// Decoding accepts `;` or `,` (whichever the header line uses more) and an optional BOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl CsvCodec {
    fn detect_delimiter(bytes: &[u8]) -> u8 {
        let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
        let semicolons = first_line.iter().filter(|b| **b == b';').count();
        let commas = first_line.iter().filter(|b| **b == b',').count();
        if commas > semicolons {
            b','
        } else {
            b';'
        }
    }
}

impl SheetCodec for CsvCodec {
    fn content_type(&self) -> &'static str {
        "text/csv;charset=utf-8;"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>, SheetError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(SheetError::Empty);
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(Self::detect_delimiter(bytes))
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.trim().to_string()).collect());
        }
        Ok(rows)
    }

    fn encode(&self, headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, SheetError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_writer(UTF8_BOM.to_vec());

        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| SheetError::Malformed(e.to_string()))
    }
}
