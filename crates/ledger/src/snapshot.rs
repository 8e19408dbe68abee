//! Persistable copy of the ledger.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    Category, Contact, ContactId, LedgerError, Money, ResultLedger, placeholder_image,
};

/// The full ordered list of contacts, as handed to a
/// [`PersistenceGateway`](crate::PersistenceGateway).
///
/// Serializes as a plain JSON array of
/// `{id, name, imageRef, balance, category}` records, with `balance` in
/// minor units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub contacts: Vec<Contact>,
}

impl Snapshot {
    #[must_use]
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    /// First-run data set: Clark, Sarah and Anthony.
    #[must_use]
    pub fn seed() -> Self {
        let seed = [
            (118_836, "Clark", -7, Category::Friend),
            (933_372, "Sarah", 20, Category::Family),
            (499_476, "Anthony", 0, Category::Colleague),
        ];
        let contacts = seed
            .into_iter()
            .map(|(raw_id, name, balance, category)| {
                let id = ContactId::from_u128(raw_id);
                Contact {
                    id,
                    name: name.to_string(),
                    image_ref: placeholder_image(id),
                    balance: Money::major(balance),
                    category,
                }
            })
            .collect();
        Self { contacts }
    }

    /// Check that no contact has a blank field and no id repeats.
    pub fn validate(&self) -> ResultLedger<()> {
        let mut seen = HashSet::with_capacity(self.contacts.len());
        for contact in &self.contacts {
            contact.validate()?;
            if !seen.insert(contact.id) {
                return Err(LedgerError::Validation(format!(
                    "duplicate contact id {}",
                    contact.id
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
