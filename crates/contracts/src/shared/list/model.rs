//! Состояние списка одной страницы
//!
//! `Idle -> Loading -> Loaded | LoadFailed`. Every load gets a ticket; a
//! completion carrying an older ticket than the latest `begin_load` is
//! dropped, so an overlapping reload or a late answer after the page moved on
//! cannot overwrite newer data. Failures never clear the items already shown.

use serde_json::Value;

use super::entity::ListEntity;
use super::filter::{filter, FilterState};
use super::mutation::{apply_mutation, MutationKind, MutationOutcome};
use super::normalize::{normalize_list, Canonical};
use super::response::decode_list;
use crate::shared::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Message ready for the user
    LoadFailed(String),
}

/// Handle of one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What a mutation did to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEffect {
    Applied,
    /// Model moved to `Loading`; fetch the list and finish with this ticket
    Reload(LoadTicket),
    /// Target record was gone; items unchanged
    Stale,
    /// Nothing loaded yet; the first load brings the change
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListModel {
    phase: ListPhase,
    items: Vec<Canonical>,
    generation: u64,
}

impl ListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn items(&self) -> &[Canonical] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ListPhase::LoadFailed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Enters `Loading` from any phase (first load, refresh, retry).
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = ListPhase::Loading;
        LoadTicket(self.generation)
    }

    /// Completes a load. Returns `false` when the ticket is outdated and nothing changed.
    pub fn finish_load<E: ListEntity>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Value, ApiError>,
    ) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "{}: dropping outdated load #{} (current #{})",
                E::collection_name(),
                ticket.0,
                self.generation
            );
            return false;
        }

        match result {
            Ok(response) => {
                self.items = normalize_list::<E>(decode_list(response, &E::list_keys()));
                self.phase = ListPhase::Loaded;
                log::debug!("{}: loaded {} records", E::collection_name(), self.items.len());
            }
            Err(e) => {
                let msg = e.user_message(&format!("Failed to load {}.", E::list_name()));
                log::warn!("{}: load failed: {}", E::collection_name(), e);
                self.phase = ListPhase::LoadFailed(msg);
            }
        }
        true
    }

    /// Applies a successful mutation response to the items on screen.
    ///
    /// After a failed refresh the retained items are still patched. A load in
    /// flight may have been answered before the mutation landed, so it is
    /// restarted with a new ticket.
    pub fn apply<E: ListEntity>(&mut self, response: &Value, kind: &MutationKind) -> MutationEffect {
        match self.phase {
            ListPhase::Idle => {
                log::debug!("{}: mutation before the first load", E::collection_name());
                return MutationEffect::Ignored;
            }
            ListPhase::Loading => {
                log::debug!("{}: mutation during a load, restarting it", E::collection_name());
                return MutationEffect::Reload(self.begin_load());
            }
            ListPhase::Loaded | ListPhase::LoadFailed(_) => {}
        }

        match apply_mutation::<E>(&self.items, response, kind) {
            MutationOutcome::Applied(items) => {
                self.items = items;
                MutationEffect::Applied
            }
            MutationOutcome::ReloadRequired => MutationEffect::Reload(self.begin_load()),
            MutationOutcome::Stale => MutationEffect::Stale,
        }
    }

    /// Items after search, filters and sort.
    pub fn visible<E: ListEntity>(&self, state: &FilterState) -> Vec<Canonical> {
        filter::<E>(&self.items, state)
    }
}
