//! Client-side list view core shared by every management page
//!
//! - `response`: response-shape decoding (list, mutation, bulk import)
//! - `normalize`: canonical records with a guaranteed `id`
//! - `filter`: search, categorical filters and sort
//! - `mutation`: local list update after create/update/delete
//! - `model`: load state machine of a page list

pub mod entity;
pub mod filter;
pub mod model;
pub mod mutation;
pub mod normalize;
pub mod path;
pub mod response;

pub use entity::{FieldKind, FieldValue, FilterField, ListEntity, RecordId, SortField, SortKind, ALL_SELECTOR};
pub use filter::{filter, CategoryFilter, FilterState, SortOrder};
pub use model::{ListModel, ListPhase, LoadTicket, MutationEffect};
pub use mutation::{apply_mutation, MutationKind, MutationOutcome};
pub use normalize::{distinct_values, normalize_list, normalize_value, Canonical, NormalizeError, SortKey};
pub use response::{decode_list, decode_mutation, ImportReport, ImportSummary, ListShape, MutationEnvelope};
