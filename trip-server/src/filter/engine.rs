//! Draft/commit filter workflow.

use tracing::debug;

use super::state::{FilterEdit, FilterState};
use crate::results::ResultSetStore;

/// Owns the committed and draft filter states.
///
/// Only the draft is edited directly. Committing copies the whole draft in
/// one assignment and re-filters the result store.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    defaults: FilterState,
    committed: FilterState,
    draft: FilterState,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl FilterEngine {
    /// Create an engine whose committed and draft states start at `defaults`.
    pub fn new(defaults: FilterState) -> Self {
        Self {
            committed: defaults.clone(),
            draft: defaults.clone(),
            defaults,
        }
    }

    pub fn committed(&self) -> &FilterState {
        &self.committed
    }

    pub fn draft(&self) -> &FilterState {
        &self.draft
    }

    pub fn defaults(&self) -> &FilterState {
        &self.defaults
    }

    /// Whether the draft holds edits that have not been committed.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Edit the draft. Has no effect on the displayed results.
    pub fn set_draft(&mut self, edit: FilterEdit) {
        debug!(field = %edit.field(), "draft filter edited");
        self.draft.apply(edit);
    }

    /// Discard draft edits, returning the draft to the committed state.
    pub fn rollback_draft(&mut self) {
        self.draft = self.committed.clone();
    }

    /// Copy the draft into the committed state and re-filter.
    pub fn commit_draft(&mut self, store: &mut ResultSetStore) {
        self.committed = self.draft.clone();
        self.reapply(store);
    }

    /// Reset both states to the defaults and re-filter.
    pub fn clear(&mut self, store: &mut ResultSetStore) {
        self.reset();
        self.reapply(store);
    }

    /// Reset both states to the defaults without touching the store.
    pub fn reset(&mut self) {
        self.committed = self.defaults.clone();
        self.draft = self.defaults.clone();
    }

    /// Evaluate the committed filter over the store's original trips.
    pub fn reapply(&self, store: &mut ResultSetStore) {
        store.apply_filter(|trip| self.committed.matches(trip));
        debug!(
            kept = store.filtered().len(),
            total = store.original().len(),
            "filters applied"
        );
    }
}
