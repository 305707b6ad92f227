pub mod a001_colony;
pub mod a002_service_category;
pub mod a003_main_category;
pub mod a004_slider;
pub mod a005_availability;
