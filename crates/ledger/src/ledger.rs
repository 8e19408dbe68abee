//! The module contains `Ledger`, which ties the store, the selection and
//! the persistence gateway together.

use std::fmt;

use crate::{
    Change, Contact, ContactDraft, ContactId, ContactStore, FilterKind, IdGenerator, LedgerError,
    MemoryGateway, Money, PersistenceError, PersistenceGateway, ResultLedger, Selection,
    Snapshot, SplitForm, view,
};

/// A user's ledger session.
///
/// Every mutation is applied in memory first and then handed to the
/// gateway. Save failures are logged and kept for
/// [`Ledger::take_persistence_error`]; the in-memory state stays
/// authoritative.
///
/// When the stored snapshot could not be loaded, saves are suspended so the
/// seed never replaces data that may still be recoverable. Mutations then
/// stay in memory until [`Ledger::resume_saves`].
pub struct Ledger {
    store: ContactStore,
    selection: Selection,
    gateway: Box<dyn PersistenceGateway>,
    persistence_error: Option<PersistenceError>,
    saves_suspended: bool,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("store", &self.store)
            .field("selection", &self.selection)
            .field("persistence_error", &self.persistence_error)
            .field("saves_suspended", &self.saves_suspended)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        self.store.all()
    }

    #[must_use]
    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.store.get(id)
    }

    /// The contact list as the user currently filters it.
    #[must_use]
    pub fn view(&self, filter: FilterKind, search: &str) -> Vec<&Contact> {
        view(self.store.all(), filter, search)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selection.current().and_then(|id| self.store.get(id))
    }

    pub fn select(&mut self, id: ContactId) {
        self.selection.select(id, &self.store);
    }

    pub fn toggle_selection(&mut self, id: ContactId) {
        self.selection.toggle(id, &self.store);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn add_contact(&mut self, draft: ContactDraft) -> ResultLedger<Contact> {
        let change = self.store.add(draft)?;
        Ok(self.persist(change))
    }

    /// Remove a contact and drop the selection if it pointed there.
    ///
    /// Returns `None` when there was no such contact.
    pub fn remove_contact(&mut self, id: ContactId) -> Option<Contact> {
        let change = self.store.remove(id)?;
        self.selection.revalidate(&self.store);
        Some(self.persist(change))
    }

    pub fn adjust_balance(&mut self, id: ContactId, delta: Money) -> ResultLedger<Contact> {
        let change = self.store.adjust_balance(id, delta)?;
        Ok(self.persist(change))
    }

    /// Apply `form` to the selected contact.
    ///
    /// On success the selection is cleared and the form reset; on failure
    /// nothing changes.
    pub fn apply_split(&mut self, form: &mut SplitForm) -> ResultLedger<Contact> {
        let id = self
            .selection
            .current()
            .ok_or_else(|| LedgerError::Validation("no contact selected".to_string()))?;
        let delta = form.compute()?;
        let change = self.store.adjust_balance(id, delta)?;
        tracing::info!(%id, %delta, payer = %form.payer(), "split applied");
        self.selection.clear();
        form.reset();
        Ok(self.persist(change))
    }

    /// The most recent persistence failure, if any, clearing it.
    pub fn take_persistence_error(&mut self) -> Option<PersistenceError> {
        self.persistence_error.take()
    }

    /// `true` while the ledger refuses to overwrite an unreadable snapshot.
    #[must_use]
    pub fn saves_suspended(&self) -> bool {
        self.saves_suspended
    }

    /// Accept the in-memory ledger as the truth and save it, replacing
    /// whatever the gateway holds.
    ///
    /// Saves stay suspended if this save fails.
    pub fn resume_saves(&mut self) -> Result<(), PersistenceError> {
        self.gateway.save(&self.store.snapshot())?;
        if self.saves_suspended {
            tracing::info!("ledger saves resumed");
        }
        self.saves_suspended = false;
        Ok(())
    }

    fn persist<T>(&mut self, change: Change<T>) -> T {
        if self.saves_suspended {
            tracing::warn!("ledger snapshot not saved: saves are suspended");
            self.persistence_error = Some(PersistenceError::Suspended);
        } else if let Err(err) = self.gateway.save(&change.snapshot) {
            tracing::warn!("failed to save ledger snapshot: {err}");
            self.persistence_error = Some(err);
        }
        change.value
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    gateway: Option<Box<dyn PersistenceGateway>>,
    id_generator: Option<IdGenerator>,
}

impl LedgerBuilder {
    /// Pass the snapshot storage. Defaults to a [`MemoryGateway`].
    pub fn gateway(mut self, gateway: impl PersistenceGateway + 'static) -> LedgerBuilder {
        self.gateway = Some(Box::new(gateway));
        self
    }

    /// Replace the random id source.
    pub fn id_generator(mut self, id_generator: IdGenerator) -> LedgerBuilder {
        self.id_generator = Some(id_generator);
        self
    }

    /// Construct `Ledger` from the stored snapshot, or from the seed
    /// contacts when none exists.
    ///
    /// An unreadable or invalid snapshot does not fail the open: the ledger
    /// starts from the seed, saves are suspended and the error is kept for
    /// [`Ledger::take_persistence_error`].
    pub fn open(self) -> ResultLedger<Ledger> {
        let mut gateway: Box<dyn PersistenceGateway> = match self.gateway {
            Some(gateway) => gateway,
            None => Box::new(MemoryGateway::new()),
        };
        let mut persistence_error = None;

        let loaded = match gateway.load() {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!("failed to load ledger snapshot, starting from seed: {err}");
                persistence_error = Some(err);
                None
            }
        };
        let fresh = loaded.is_none() && persistence_error.is_none();

        let snapshot = match loaded {
            Some(snapshot) => match snapshot.validate() {
                Ok(()) => {
                    tracing::info!(contacts = snapshot.len(), "ledger loaded from snapshot");
                    snapshot
                }
                Err(err) => {
                    tracing::warn!("invalid ledger snapshot, starting from seed: {err}");
                    persistence_error = Some(PersistenceError::Corrupt(err.to_string()));
                    Snapshot::seed()
                }
            },
            None => {
                tracing::info!("no ledger snapshot found, starting from seed");
                Snapshot::seed()
            }
        };

        let saves_suspended = persistence_error.is_some();
        let mut builder = ContactStore::builder().snapshot(snapshot);
        if let Some(id_generator) = self.id_generator {
            builder = builder.id_generator(id_generator);
        }
        let store = builder.build()?;

        if fresh && let Err(err) = gateway.save(&store.snapshot()) {
            tracing::warn!("failed to save seed snapshot: {err}");
            persistence_error = Some(err);
        }

        Ok(Ledger {
            store,
            selection: Selection::default(),
            gateway,
            persistence_error,
            saves_suspended,
        })
    }
}
