//! Shared contracts for the society-services admin panel.
//!
//! - `domain`: entity schemas and mutation payloads (colonies, categories, sliders, availability)
//! - `system`: admin auth and user management shapes
//! - `shared`: the list view core (decode, normalize, filter, mutate) and spreadsheet codecs

pub mod domain;
pub mod shared;
pub mod system;
