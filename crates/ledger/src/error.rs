//! The module contains the errors the ledger can return.
//!
//! The errors are:
//!
//! - [`Validation`] returned when the input is rejected before any mutation.
//! - [`NotFound`] returned when an operation references an unknown contact.
//! - [`Persistence`] returned when the [`PersistenceGateway`] fails.
//!
//!  [`Validation`]: LedgerError::Validation
//!  [`NotFound`]: LedgerError::NotFound
//!  [`Persistence`]: LedgerError::Persistence
//!  [`PersistenceGateway`]: crate::PersistenceGateway
use thiserror::Error;

/// Ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Failures of the snapshot load/save collaborator.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
    #[error("saving paused: the stored snapshot could not be loaded")]
    Suspended,
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
