//! Реактивная обертка над `ListModel` для страниц-списков
//!
//! One controller per page. It owns the model, the filter state and the
//! pending notices (toasts), and runs loads and reloads with `spawn_local`.

use std::marker::PhantomData;

use contracts::shared::error::{server_message, ApiError};
use contracts::shared::list::{
    Canonical, FilterState, ImportReport, ListEntity, ListModel, LoadTicket, MutationEffect,
    MutationKind, RecordId, SortOrder,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

use crate::shared::http::ApiClient;

/// Тексты уведомлений формы; сообщение сервера имеет приоритет
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTexts {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub save_failed: &'static str,
    pub delete_failed: &'static str,
}

impl FormTexts {
    pub const GENERIC: FormTexts = FormTexts {
        created: "Created successfully",
        updated: "Updated successfully",
        deleted: "Deleted successfully",
        save_failed: "Failed to save.",
        delete_failed: "Failed to delete.",
    };
}

/// Сущность, список которой загружается с сервера
pub trait ListSource: ListEntity + 'static {
    /// GET endpoint returning the whole list
    fn list_path() -> &'static str;

    fn texts() -> FormTexts {
        FormTexts::GENERIC
    }

    /// Order the page opens with; `None` keeps the server order
    fn default_sort() -> Option<SortOrder> {
        None
    }
}

/// Filter state of a freshly opened (or reset) page
pub fn default_filters<E: ListSource>() -> FilterState {
    FilterState {
        sort: E::default_sort(),
        ..FilterState::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// Сообщение для всплывающего уведомления
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Toast for a finished mutation: the server message wins, then the given texts.
pub fn mutation_notice(result: &Result<Value, ApiError>, success: &str, failure: &str) -> Notice {
    match result {
        Ok(response) => Notice::success(server_message(response).unwrap_or_else(|| success.to_string())),
        Err(e) => Notice::error(e.user_message(failure)),
    }
}

/// Toasts for a finished import, in display order.
pub fn import_notices(report: &ImportReport, list_name: &str) -> Vec<Notice> {
    let mut out = Vec::new();
    if let Some(text) = report.success_text(list_name) {
        out.push(Notice::success(text));
    }
    if let Some(text) = report.warning_text() {
        out.push(Notice::warning(text));
    }
    if out.is_empty() {
        out.push(Notice::warning(
            report
                .message
                .clone()
                .unwrap_or_else(|| "Nothing was imported".to_string()),
        ));
    }
    out
}

pub struct ListController<E: ListSource> {
    model: RwSignal<ListModel>,
    filters: RwSignal<FilterState>,
    notices: RwSignal<Vec<Notice>>,
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: ListSource> Clone for ListController<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: ListSource> Copy for ListController<E> {}

impl<E: ListSource> ListController<E> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            model: RwSignal::new(ListModel::new()),
            filters: RwSignal::new(default_filters::<E>()),
            notices: RwSignal::new(Vec::new()),
            client,
            _entity: PhantomData,
        }
    }

    pub fn client(&self) -> ApiClient {
        self.client
    }

    // ------------------------------------------------------------------
    // Reads (tracked)
    // ------------------------------------------------------------------

    pub fn is_loading(&self) -> bool {
        self.model.with(ListModel::is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.model.with(|m| m.error().map(str::to_string))
    }

    /// All loaded records, unfiltered
    pub fn items(&self) -> Vec<Canonical> {
        self.model.with(|m| m.items().to_vec())
    }

    /// Records after search, filters and sort
    pub fn visible(&self) -> Vec<Canonical> {
        self.model
            .with(|m| self.filters.with(|f| m.visible::<E>(f)))
    }

    pub fn filters(&self) -> FilterState {
        self.filters.get()
    }

    /// Toasts not yet dismissed, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.get()
    }

    pub fn dismiss_notice(&self, index: usize) {
        self.notices.update(|n| {
            if index < n.len() {
                n.remove(index);
            }
        });
    }

    pub fn notify(&self, notice: Notice) {
        self.notices.update(|n| n.push(notice));
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    pub fn set_query(&self, query: String) {
        self.filters.update(|f| f.query = query);
    }

    /// `selector` is the dropdown value (`"all"`, `"active"`, a city, ...)
    pub fn set_selector(&self, name: &str, selector: &str) {
        self.filters
            .update(|f| *f = std::mem::take(f).with_selector::<E>(name, selector));
    }

    pub fn set_sort(&self, order: Option<SortOrder>) {
        self.filters.update(|f| f.sort = order);
    }

    pub fn clear_filters(&self) {
        self.filters.set(default_filters::<E>());
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Initial load, refresh and retry all go through here.
    pub fn load(&self) {
        let Some(ticket) = self.model.try_update(ListModel::begin_load) else {
            return;
        };
        self.fetch(ticket);
    }

    fn fetch(&self, ticket: LoadTicket) {
        let this = *self;
        spawn_local(async move {
            let result = this.client.get(E::list_path()).await;
            let applied = this
                .model
                .try_update(|m| m.finish_load::<E>(ticket, result))
                .unwrap_or(false);
            if applied {
                if let Some(msg) = this.model.with_untracked(|m| m.error().map(str::to_string)) {
                    this.notify(Notice::error(msg));
                }
            }
        });
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Applies the outcome of a create/update/delete request and shows a toast.
    ///
    /// Returns `true` when the request succeeded (the form can close).
    pub fn complete(
        &self,
        result: Result<Value, ApiError>,
        kind: MutationKind,
        success: &str,
        failure: &str,
    ) -> bool {
        self.notify(mutation_notice(&result, success, failure));

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{}: mutation failed: {}", E::collection_name(), e);
                return false;
            }
        };

        let effect = self
            .model
            .try_update(|m| m.apply::<E>(&response, &kind))
            .unwrap_or(MutationEffect::Ignored);
        match effect {
            MutationEffect::Reload(ticket) => {
                log::debug!("{}: response without a record, reloading", E::collection_name());
                self.fetch(ticket);
            }
            MutationEffect::Stale => {
                log::debug!("{}: {:?} target is gone", E::collection_name(), kind);
            }
            MutationEffect::Applied | MutationEffect::Ignored => {}
        }
        true
    }

    /// Create (`editing == None`) or update of the record being edited.
    pub fn complete_save(&self, result: Result<Value, ApiError>, editing: Option<RecordId>) -> bool {
        let texts = E::texts();
        match editing {
            None => self.complete(result, MutationKind::Create, texts.created, texts.save_failed),
            Some(id) => self.complete(result, MutationKind::Update { id }, texts.updated, texts.save_failed),
        }
    }

    pub fn complete_delete(&self, result: Result<Value, ApiError>, id: RecordId) -> bool {
        let texts = E::texts();
        self.complete(result, MutationKind::Delete { id }, texts.deleted, texts.delete_failed)
    }

    /// Shows the import toasts and reloads when anything was imported.
    pub fn complete_import(&self, result: Result<ImportReport, ApiError>) -> bool {
        match result {
            Ok(report) => {
                for notice in import_notices(&report, E::list_name()) {
                    self.notify(notice);
                }
                for error in &report.errors {
                    log::info!("{}: import row rejected: {}", E::collection_name(), error);
                }
                if report.needs_reload() {
                    self.load();
                }
                true
            }
            Err(e) => {
                self.notify(Notice::error(e.user_message("Failed to import file")));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::list::ImportSummary;
    use serde_json::json;

    #[test]
    fn test_mutation_notice() {
        assert_eq!(
            mutation_notice(&Ok(json!({ "message": "Colony created" })), "Created", "Failed"),
            Notice::success("Colony created")
        );
        assert_eq!(
            mutation_notice(&Ok(Value::Null), "Colony created successfully", "Failed"),
            Notice::success("Colony created successfully")
        );
        assert_eq!(
            mutation_notice(
                &Err(ApiError::Server { status: 500, message: None }),
                "ok",
                "Failed to delete colony."
            ),
            Notice::error("Failed to delete colony.")
        );
    }

    #[test]
    fn test_import_notices() {
        let report = ImportReport {
            summary: ImportSummary {
                imported: 3,
                failed: 1,
                duplicates: 2,
                total_records: 6,
            },
            errors: vec![],
            message: None,
        };
        let notices = import_notices(&report, "colonies");
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind, NoticeKind::Success);
        assert_eq!(notices[1].kind, NoticeKind::Warning);

        let notices = import_notices(&ImportReport::default(), "colonies");
        assert_eq!(notices, vec![Notice::warning("Nothing was imported")]);
    }
}
