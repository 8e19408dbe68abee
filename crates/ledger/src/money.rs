use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Minor units per major unit (paise per rupee).
const MINOR_PER_MAJOR: i64 = 100;

/// Signed amount of money, stored as a whole number of paise.
///
/// Balances, bills and shares are all `Money`, so any sequence of splits
/// adds up to the paisa. `i64::MIN` is never produced by ledger arithmetic,
/// which keeps `abs` and negation total.
///
/// ```rust
/// use ledger::Money;
///
/// assert_eq!("10,10".parse::<Money>().unwrap(), Money::new(1010));
/// assert_eq!(Money::major(-7).to_string(), "-₹7.00");
/// assert!("3.333".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest magnitude a balance may reach in either direction.
    pub const LIMIT: Money = Money(i64::MAX);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole rupees. Takes an `i32` so the conversion cannot overflow.
    #[must_use]
    pub const fn major(units: i32) -> Self {
        Self(units as i64 * MINOR_PER_MAJOR)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `true` unless the amount is `i64::MIN`, the one value whose
    /// magnitude does not fit.
    #[must_use]
    pub const fn in_range(self) -> bool {
        self.0 != i64::MIN
    }

    /// Magnitude of the amount; `i64::MIN` saturates to [`Money::LIMIT`].
    #[must_use]
    pub const fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// Addition that fails instead of leaving `[-LIMIT, LIMIT]`.
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0
            .checked_add(rhs.0)
            .map(Money)
            .filter(|sum| sum.in_range())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let paise = magnitude % MINOR_PER_MAJOR as u64;
        let rupees = magnitude / MINOR_PER_MAJOR as u64;
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "₹{rupees}.{paise:02}")
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    /// Reads amounts as typed into the split form: `12`, `12.5`, `12,50`,
    /// with an optional sign. More than two decimals is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reject = |why: &str| LedgerError::Validation(format!("{why}: {:?}", s.trim()));

        let text = s.trim();
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, text[1..].trim_start()),
            Some(b'+') => (false, text[1..].trim_start()),
            _ => (false, text),
        };
        if digits.is_empty() {
            return Err(reject("empty amount"));
        }

        let (whole, fraction) = digits
            .split_once(['.', ','])
            .unwrap_or((digits, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Err(reject("invalid amount"));
        }
        let paise = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            2 => i64::from(fraction.as_bytes()[0] - b'0') * 10
                + i64::from(fraction.as_bytes()[1] - b'0'),
            _ => return Err(reject("too many decimals")),
        };

        let magnitude = whole
            .parse::<i64>()
            .ok()
            .and_then(|rupees| rupees.checked_mul(MINOR_PER_MAJOR))
            .and_then(|minor| minor.checked_add(paise))
            .ok_or_else(|| reject("amount too large"))?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }
}
