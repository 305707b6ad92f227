pub mod api_utils;
pub mod excel_importer;
pub mod export;
pub mod http;
pub mod list_controller;
