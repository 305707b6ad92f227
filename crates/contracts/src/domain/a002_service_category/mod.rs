pub mod aggregate;

pub use aggregate::{ServiceCategory, ServiceCategoryPayload};
