pub mod parser;

pub use parser::{read_import_file, SheetJsCodec};
