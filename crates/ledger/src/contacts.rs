//! The module contains `Contact` and the types describing it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Money, ResultLedger, util::normalize_display};

/// Stable identifier for a contact.
///
/// Allocated by the store when the contact is added and never reused, so a
/// removed contact cannot be confused with a later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(Uuid);

impl ContactId {
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    #[must_use]
    pub const fn uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Relationship of a contact to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Friend,
    Family,
    Colleague,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Friend, Category::Family, Category::Colleague];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Category::Friend => "Friend",
            Category::Family => "Family",
            Category::Colleague => "Colleague",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LedgerError::Validation(format!("unknown category: {trimmed}")))
    }
}

/// A person the user shares expenses with.
///
/// `balance` is positive when the contact owes the user and negative when
/// the user owes the contact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub image_ref: String,
    pub balance: Money,
    pub category: Category,
}

impl Contact {
    /// Where the user stands with this contact.
    #[must_use]
    pub fn status(&self) -> BalanceStatus<'_> {
        let kind = if self.balance.is_negative() {
            StatusKind::IOwe(self.balance.abs())
        } else if self.balance.is_positive() {
            StatusKind::OwesMe(self.balance)
        } else {
            StatusKind::Even
        };
        BalanceStatus {
            name: &self.name,
            kind,
        }
    }

    pub(crate) fn validate(&self) -> ResultLedger<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation(format!(
                "contact {} has an empty name",
                self.id
            )));
        }
        if self.image_ref.trim().is_empty() {
            return Err(LedgerError::Validation(format!(
                "contact {} has an empty image reference",
                self.id
            )));
        }
        if !self.balance.in_range() {
            return Err(LedgerError::Validation(format!(
                "contact {} has a balance beyond {}",
                self.id,
                Money::LIMIT
            )));
        }
        Ok(())
    }
}

/// Net position between the user and one contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// The user owes the contact this (positive) amount.
    IOwe(Money),
    /// The contact owes the user this (positive) amount.
    OwesMe(Money),
    Even,
}

/// A contact's [`StatusKind`] paired with their name, printable as a sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceStatus<'a> {
    pub name: &'a str,
    pub kind: StatusKind,
}

impl fmt::Display for BalanceStatus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name;
        match self.kind {
            StatusKind::IOwe(amount) => write!(f, "you owe {name} {amount}"),
            StatusKind::OwesMe(amount) => write!(f, "{name} owes you {amount}"),
            StatusKind::Even => write!(f, "you and {name} are even"),
        }
    }
}

/// Input for [`ContactStore::add`](crate::ContactStore::add).
#[derive(Clone, Debug)]
pub struct ContactDraft {
    pub name: String,
    pub image_ref: Option<String>,
    pub balance: Money,
    pub category: Category,
}

impl ContactDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_ref: None,
            balance: Money::ZERO,
            category: Category::default(),
        }
    }

    #[must_use]
    pub fn image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    #[must_use]
    pub fn balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Validate the draft and turn it into a contact with the given id.
    pub(crate) fn into_contact(self, id: ContactId) -> ResultLedger<Contact> {
        let name = normalize_display(&self.name, "contact name")?;
        let image_ref = match self.image_ref {
            Some(image_ref) => {
                let trimmed = image_ref.trim();
                if trimmed.is_empty() {
                    return Err(LedgerError::Validation(
                        "image reference must not be empty".to_string(),
                    ));
                }
                trimmed.to_string()
            }
            None => placeholder_image(id),
        };
        let contact = Contact {
            id,
            name,
            image_ref,
            balance: self.balance,
            category: self.category,
        };
        contact.validate()?;
        Ok(contact)
    }
}

/// Avatar used when a contact is added without an image.
#[must_use]
pub fn placeholder_image(id: ContactId) -> String {
    format!("https://i.pravatar.cc/48?u={id}")
}
