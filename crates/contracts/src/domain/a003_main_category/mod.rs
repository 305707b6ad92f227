pub mod aggregate;

pub use aggregate::{MainCategory, MainCategoryPayload};
