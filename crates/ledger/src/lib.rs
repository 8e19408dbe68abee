//! Per-contact balances and bill splitting.
//!
//! [`Ledger`] is the entry point: it owns the [`ContactStore`], the current
//! [`Selection`] and a [`PersistenceGateway`], and saves a [`Snapshot`]
//! after every change.

pub use contacts::{
    BalanceStatus, Category, Contact, ContactDraft, ContactId, StatusKind, placeholder_image,
};
pub use error::{LedgerError, PersistenceError};
pub use filter::{FilterKind, view};
pub use ledger::{Ledger, LedgerBuilder};
pub use money::Money;
pub use persistence::{JsonFileGateway, MemoryGateway, PersistenceGateway};
pub use selection::Selection;
pub use snapshot::Snapshot;
pub use split::{ClampOutcome, Payer, SplitForm, compute_split};
pub use store::{
    Change, ContactStore, ContactStoreBuilder, IdGenerator, random_ids, sequential_ids,
};

mod contacts;
mod error;
mod filter;
mod ledger;
mod money;
mod persistence;
mod selection;
mod snapshot;
mod split;
mod store;
mod util;

pub type ResultLedger<T> = Result<T, LedgerError>;
