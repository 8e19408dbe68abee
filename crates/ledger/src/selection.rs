//! The contact currently targeted by a split.

use crate::{ContactId, ContactStore};

/// Optional reference to one contact in a [`ContactStore`].
///
/// Every transition checks the store, so the selection never points at a
/// contact that is gone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection(Option<ContactId>);

impl Selection {
    #[must_use]
    pub fn current(self) -> Option<ContactId> {
        self.0
    }

    #[must_use]
    pub fn is_selected(self, id: ContactId) -> bool {
        self.0 == Some(id)
    }

    /// Select `id` if the store has it; otherwise leave things as they are.
    pub fn select(&mut self, id: ContactId, store: &ContactStore) {
        if store.contains(id) {
            self.0 = Some(id);
        } else {
            tracing::debug!(%id, "ignoring selection of unknown contact");
        }
    }

    /// Deselect `id` if it is selected, otherwise select it.
    pub fn toggle(&mut self, id: ContactId, store: &ContactStore) {
        if self.is_selected(id) {
            self.clear();
        } else {
            self.select(id, store);
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Drop the selection if its contact is no longer in `store`.
    pub fn revalidate(&mut self, store: &ContactStore) {
        if let Some(id) = self.0
            && !store.contains(id)
        {
            self.0 = None;
        }
    }
}
