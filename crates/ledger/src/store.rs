//! The module contains `ContactStore`, the owner of every contact record.

use std::{collections::HashSet, fmt};

use uuid::Uuid;

use crate::{Contact, ContactDraft, ContactId, LedgerError, Money, ResultLedger, Snapshot};

/// Upper bound on redraws when the generator returns a taken id.
const MAX_ID_ATTEMPTS: usize = 16;

/// Source of fresh contact ids.
///
/// The store skips ids it has seen removed, but that memory lives only as
/// long as the store: snapshots carry no retired ids. A deterministic
/// generator restarted across sessions can therefore hand out an id removed
/// in an earlier one unless those ids are passed to
/// [`ContactStoreBuilder::retired_ids`].
pub type IdGenerator = Box<dyn FnMut() -> ContactId + Send>;

/// Random v4 UUIDs.
#[must_use]
pub fn random_ids() -> IdGenerator {
    Box::new(|| ContactId::from_uuid(Uuid::new_v4()))
}

/// Deterministic ids `start`, `start + 1`, ...; meant for tests.
#[must_use]
pub fn sequential_ids(start: u128) -> IdGenerator {
    let mut next = start;
    Box::new(move || {
        let id = ContactId::from_u128(next);
        next = next.wrapping_add(1);
        id
    })
}

/// Result of a mutation: the affected value plus the ledger after the change.
///
/// Callers forward `snapshot` to the persistence layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change<T> {
    pub value: T,
    pub snapshot: Snapshot,
}

/// Ordered collection of contacts.
///
/// Insertion order is the display order. Balances only move through
/// [`ContactStore::adjust_balance`].
pub struct ContactStore {
    contacts: Vec<Contact>,
    retired: HashSet<ContactId>,
    next_id: IdGenerator,
}

impl fmt::Debug for ContactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactStore")
            .field("contacts", &self.contacts)
            .field("retired", &self.retired.len())
            .finish_non_exhaustive()
    }
}

impl ContactStore {
    /// Return a builder for `ContactStore`. Help to build the struct.
    pub fn builder() -> ContactStoreBuilder {
        ContactStoreBuilder::default()
    }

    /// Read-only view of all contacts in display order.
    #[must_use]
    pub fn all(&self) -> &[Contact] {
        &self.contacts
    }

    #[must_use]
    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ContactId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.contacts.clone())
    }

    /// Append a new contact built from `draft`.
    pub fn add(&mut self, draft: ContactDraft) -> ResultLedger<Change<Contact>> {
        let id = self.fresh_id()?;
        let contact = draft.into_contact(id)?;
        self.contacts.push(contact.clone());
        tracing::debug!(id = %contact.id, name = %contact.name, "contact added");
        Ok(Change {
            value: contact,
            snapshot: self.snapshot(),
        })
    }

    /// Remove a contact. Unknown ids are ignored and yield `None`.
    pub fn remove(&mut self, id: ContactId) -> Option<Change<Contact>> {
        let index = self.contacts.iter().position(|contact| contact.id == id)?;
        let removed = self.contacts.remove(index);
        self.retired.insert(id);
        tracing::debug!(%id, name = %removed.name, "contact removed");
        Some(Change {
            value: removed,
            snapshot: self.snapshot(),
        })
    }

    /// Add `delta` to a contact's balance.
    pub fn adjust_balance(
        &mut self,
        id: ContactId,
        delta: Money,
    ) -> ResultLedger<Change<Contact>> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|contact| contact.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        let balance = contact.balance.checked_add(delta).ok_or_else(|| {
            LedgerError::Validation(format!("balance overflow for contact {id}"))
        })?;
        contact.balance = balance;
        let updated = contact.clone();
        tracing::debug!(%id, %delta, balance = %updated.balance, "balance adjusted");
        Ok(Change {
            value: updated,
            snapshot: self.snapshot(),
        })
    }

    fn fresh_id(&mut self) -> ResultLedger<ContactId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.next_id)();
            if !self.retired.contains(&id) && !self.contains(id) {
                return Ok(id);
            }
        }
        Err(LedgerError::Validation("id generator exhausted".to_string()))
    }
}

/// The builder for `ContactStore`
#[derive(Default)]
pub struct ContactStoreBuilder {
    snapshot: Option<Snapshot>,
    id_generator: Option<IdGenerator>,
    retired: HashSet<ContactId>,
}

impl ContactStoreBuilder {
    /// Start from a loaded snapshot instead of an empty ledger.
    pub fn snapshot(mut self, snapshot: Snapshot) -> ContactStoreBuilder {
        self.snapshot = Some(snapshot);
        self
    }

    /// Replace the random id source.
    pub fn id_generator(mut self, id_generator: IdGenerator) -> ContactStoreBuilder {
        self.id_generator = Some(id_generator);
        self
    }

    /// Ids removed in earlier sessions that must not be handed out again.
    pub fn retired_ids(
        mut self,
        ids: impl IntoIterator<Item = ContactId>,
    ) -> ContactStoreBuilder {
        self.retired.extend(ids);
        self
    }

    /// Construct `ContactStore`, rejecting snapshots with blank fields or
    /// repeated ids.
    pub fn build(self) -> ResultLedger<ContactStore> {
        let snapshot = self.snapshot.unwrap_or_default();
        snapshot.validate()?;
        let contacts = snapshot.contacts;
        Ok(ContactStore {
            contacts,
            retired: self.retired,
            next_id: self.id_generator.unwrap_or_else(random_ids),
        })
    }
}
