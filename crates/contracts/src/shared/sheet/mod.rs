//! Spreadsheet import/export as a pluggable capability
//!
//! The list pages only see [`SheetCodec`]; the CSV codec here works everywhere,
//! the browser build plugs in a SheetJS-backed one for `.xlsx`.

pub mod codec;
pub mod export;
pub mod types;

pub use codec::{CsvCodec, SheetCodec, SheetError};
pub use export::{export_file_name, export_records, validate_import_file, SheetExportable, ACCEPTED_IMPORT_TYPES, MAX_IMPORT_BYTES};
pub use types::{ColumnDef, ColumnMapping, SheetData, SheetMetadata};
