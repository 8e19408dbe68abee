//! Bill splitting between the user and one contact.
//!
//! [`compute_split`] is the pure rule turning a bill into a balance delta.
//! [`SplitForm`] holds the in-progress entry and keeps the user's share
//! inside `[0, bill]` while it is being typed.

use std::fmt;

use crate::{LedgerError, Money, ResultLedger};

/// Who paid the bill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Payer {
    #[default]
    User,
    Friend,
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payer::User => f.write_str("user"),
            Payer::Friend => f.write_str("friend"),
        }
    }
}

/// Delta to add to the contact's balance after splitting `bill`.
///
/// - `Payer::User`: the contact owes their share, `+(bill - user_expense)`.
/// - `Payer::Friend`: the user owes their share, `-user_expense`.
pub fn compute_split(bill: Money, user_expense: Money, payer: Payer) -> ResultLedger<Money> {
    if !bill.is_positive() {
        return Err(LedgerError::Validation(format!(
            "bill must be > 0, got {bill}"
        )));
    }
    if user_expense.is_negative() || user_expense > bill {
        return Err(LedgerError::Validation(format!(
            "your expense must be between {} and {bill}, got {user_expense}",
            Money::ZERO
        )));
    }
    let delta = match payer {
        Payer::User => bill - user_expense,
        Payer::Friend => -user_expense,
    };
    Ok(delta)
}

/// What happened to the user's share on the last edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClampOutcome {
    /// The new value was stored.
    Accepted,
    /// The value exceeded the bill; the previous value was kept.
    Kept,
}

/// In-progress split entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitForm {
    bill: Option<Money>,
    user_expense: Option<Money>,
    payer: Payer,
}

impl SplitForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bill(&self) -> Option<Money> {
        self.bill
    }

    #[must_use]
    pub fn user_expense(&self) -> Option<Money> {
        self.user_expense
    }

    #[must_use]
    pub fn payer(&self) -> Payer {
        self.payer
    }

    /// The contact's share, implied by the bill and the user's share.
    #[must_use]
    pub fn friend_expense(&self) -> Option<Money> {
        match (self.bill, self.user_expense) {
            (Some(bill), Some(user_expense)) => Some(bill - user_expense),
            _ => None,
        }
    }

    /// Set the bill from user input. Blank input clears it.
    ///
    /// A lower bill pulls the user's share down with it.
    pub fn set_bill(&mut self, input: &str) -> ResultLedger<()> {
        if input.trim().is_empty() {
            self.bill = None;
            return Ok(());
        }
        let bill: Money = input.parse()?;
        if !bill.is_positive() {
            return Err(LedgerError::Validation(format!(
                "bill must be > 0, got {bill}"
            )));
        }
        self.bill = Some(bill);
        if let Some(user_expense) = self.user_expense
            && user_expense > bill
        {
            self.user_expense = Some(bill);
        }
        Ok(())
    }

    /// Set the user's share from user input. Blank input clears it.
    ///
    /// A share above the current bill is ignored and the previous value kept.
    pub fn set_user_expense(&mut self, input: &str) -> ResultLedger<ClampOutcome> {
        if input.trim().is_empty() {
            self.user_expense = None;
            return Ok(ClampOutcome::Accepted);
        }
        let user_expense: Money = input.parse()?;
        if user_expense.is_negative() {
            return Err(LedgerError::Validation(format!(
                "your expense must be >= 0, got {user_expense}"
            )));
        }
        if let Some(bill) = self.bill
            && user_expense > bill
        {
            tracing::debug!(%bill, %user_expense, "user expense above bill ignored");
            return Ok(ClampOutcome::Kept);
        }
        self.user_expense = Some(user_expense);
        Ok(ClampOutcome::Accepted)
    }

    pub fn set_payer(&mut self, payer: Payer) {
        self.payer = payer;
    }

    /// Run [`compute_split`] on the current entry.
    pub fn compute(&self) -> ResultLedger<Money> {
        let bill = self
            .bill
            .ok_or_else(|| LedgerError::Validation("bill is required".to_string()))?;
        let user_expense = self
            .user_expense
            .ok_or_else(|| LedgerError::Validation("your expense is required".to_string()))?;
        compute_split(bill, user_expense, self.payer)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
