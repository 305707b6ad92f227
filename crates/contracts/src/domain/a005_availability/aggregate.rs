use crate::shared::list::path::{resolve, scalar_text};
use crate::shared::list::{Canonical, FilterField, ListEntity, SortField};

/// Слот доступности мастера (дата, время, обслуживаемые колонии)
///
/// Read-only list; sorted by `date`, then by `startTime` when both slots have one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Availability;

impl Availability {
    pub const SERVICE_CATEGORY: FilterField =
        FilterField::text("serviceCategory", "user.serviceCategory");
    pub const TATKAL: FilterField = FilterField::flag("tatkal", "user.tatkalEnabled", "yes", "no");
    pub const STATUS: FilterField =
        FilterField::flag("status", "isAvailable", "available", "unavailable");
}

impl ListEntity for Availability {
    fn collection_name() -> &'static str {
        "availability"
    }

    fn element_name() -> &'static str {
        "availability"
    }

    fn search_paths() -> &'static [&'static str] {
        &[
            "user.fullName",
            "user.mobileNumber",
            "user.role",
            "user.serviceCategory",
            "notes",
            "colonies[].name",
            "colonies[].city",
            "colonies[].pincode",
        ]
    }

    fn filter_fields() -> &'static [FilterField] {
        const FIELDS: &[FilterField] = &[
            Availability::SERVICE_CATEGORY,
            Availability::TATKAL,
            Availability::STATUS,
        ];
        FIELDS
    }

    fn nested_relations() -> &'static [&'static str] {
        &["colonies"]
    }

    fn sort_fields() -> &'static [SortField] {
        const FIELDS: &[SortField] = &[SortField::date("date"), SortField::text("startTime")];
        FIELDS
    }
}

impl Availability {
    /// `09:00 - 11:30`, or whichever end is known.
    pub fn time_range(record: &Canonical) -> String {
        let start = record.field_text("startTime");
        let end = record.field_text("endTime");
        match (start.is_empty(), end.is_empty()) {
            (false, false) => format!("{} - {}", start, end),
            (false, true) => start,
            (true, false) => end,
            (true, true) => "-".to_string(),
        }
    }

    /// Names of the covered colonies, comma separated
    pub fn colony_names(record: &Canonical) -> String {
        resolve(&record.raw, "colonies[].name")
            .into_iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
