pub mod aggregate;

pub use aggregate::{
    import_columns, import_preview_warning, BulkDeleteRequest, Colony, ColonyPayload, IMPORT_PREVIEW_ROWS,
};
