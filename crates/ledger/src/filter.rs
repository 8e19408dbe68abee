//! Filtered, searchable view over the contact list.

use std::{fmt, str::FromStr};

use crate::{Category, Contact, LedgerError, util::fold_key};

/// Which contacts the list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterKind {
    #[default]
    All,
    /// Contacts with a positive balance.
    TheyOweMe,
    /// Contacts with a negative balance.
    IOweThem,
    Category(Category),
}

impl FilterKind {
    fn keeps(self, contact: &Contact) -> bool {
        match self {
            FilterKind::All => true,
            FilterKind::TheyOweMe => contact.balance.is_positive(),
            FilterKind::IOweThem => contact.balance.is_negative(),
            FilterKind::Category(category) => contact.category == category,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::All => f.write_str("all"),
            FilterKind::TheyOweMe => f.write_str("they-owe-me"),
            FilterKind::IOweThem => f.write_str("i-owe-them"),
            FilterKind::Category(category) => write!(f, "{category}"),
        }
    }
}

impl FromStr for FilterKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterKind::All),
            "they-owe-me" => Ok(FilterKind::TheyOweMe),
            "i-owe-them" => Ok(FilterKind::IOweThem),
            _ => trimmed
                .parse::<Category>()
                .map(FilterKind::Category)
                .map_err(|_| LedgerError::Validation(format!("unknown filter: {trimmed}"))),
        }
    }
}

/// Contacts passing `filter` whose name contains `search`, in input order.
///
/// Matching ignores case and accents; a blank `search` matches everyone.
#[must_use]
pub fn view<'a>(contacts: &'a [Contact], filter: FilterKind, search: &str) -> Vec<&'a Contact> {
    let needle = fold_key(search.trim());
    contacts
        .iter()
        .filter(|contact| filter.keeps(contact))
        .filter(|contact| needle.is_empty() || fold_key(&contact.name).contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Money, Snapshot};

    fn names<'a>(contacts: &[&'a Contact]) -> Vec<&'a str> {
        contacts.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn balance_filters_keep_order() {
        let mut contacts = Snapshot::seed().contacts;
        contacts[2].balance = Money::major(5);
        assert_eq!(
            names(&view(&contacts, FilterKind::TheyOweMe, "")),
            ["Sarah", "Anthony"]
        );
        assert_eq!(names(&view(&contacts, FilterKind::IOweThem, "")), ["Clark"]);
        assert_eq!(view(&contacts, FilterKind::All, "").len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let contacts = Snapshot::seed().contacts;
        assert_eq!(names(&view(&contacts, FilterKind::All, "ar")), ["Clark", "Sarah"]);
        assert_eq!(names(&view(&contacts, FilterKind::All, "SAR")), ["Sarah"]);
        assert_eq!(names(&view(&contacts, FilterKind::All, "  ")).len(), 3);
        assert!(view(&contacts, FilterKind::All, "zed").is_empty());
    }

    #[test]
    fn category_filter_combines_with_search() {
        let contacts = Snapshot::seed().contacts;
        let family = FilterKind::Category(Category::Family);
        assert_eq!(names(&view(&contacts, family, "")), ["Sarah"]);
        assert!(view(&contacts, family, "clark").is_empty());
    }

    #[test]
    fn parse_filter_kinds() {
        assert_eq!("ALL".parse::<FilterKind>().unwrap(), FilterKind::All);
        assert_eq!("they-owe-me".parse::<FilterKind>().unwrap(), FilterKind::TheyOweMe);
        assert_eq!(
            "colleague".parse::<FilterKind>().unwrap(),
            FilterKind::Category(Category::Colleague)
        );
        assert!("nobody".parse::<FilterKind>().is_err());
    }
}
