//! Internal helpers for text normalization.
//!
//! These utilities are **not** part of the public API. They keep name
//! validation and search matching consistent across the crate.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{LedgerError, ResultLedger};

/// Trim a display name and collapse inner whitespace runs to one space.
pub(crate) fn normalize_display(input: &str, label: &str) -> ResultLedger<String> {
    let mut out = String::new();
    for token in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() {
        return Err(LedgerError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(out)
}

/// Fold text for case- and accent-insensitive matching.
pub(crate) fn fold_key(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        out.extend(ch.to_lowercase());
    }
    out
}
