use contracts::domain::a005_availability::Availability;
use contracts::shared::list::SortOrder;

use crate::shared::list_controller::ListSource;

/// Read-only for the admin; slots are managed by the service providers
impl ListSource for Availability {
    fn list_path() -> &'static str {
        "/api/availability"
    }

    /// By date, then start time
    fn default_sort() -> Option<SortOrder> {
        Some(SortOrder::Ascending)
    }
}
