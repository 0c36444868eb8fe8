//! Credit amounts and balances.
//!
//! Credits are decimal in the product (4.0, 0.04) but are held as an exact
//! integer count of hundredths so balances never drift through floating-point
//! rounding. Conversion to a decimal number happens only at serialisation.

use std::fmt;

use serde::{Serialize, Serializer};

/// Number of hundredths in one whole credit.
const HUNDREDTHS_PER_CREDIT: u64 = 100;

/// A non-negative amount of credits, stored in hundredths.
///
/// # Examples
/// ```
/// use bloom_backend::domain::Credits;
///
/// let balance = Credits::from_hundredths(396);
/// assert_eq!(balance.to_string(), "3.96");
/// assert_eq!(balance.remaining_predictions(), 99);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Credits(u64);

/// Price of a single prediction: 0.04 credits.
pub const UNIT_COST: Credits = Credits::from_hundredths(4);

/// Balance granted to every new account: 4.0 credits.
pub const DEFAULT_BALANCE: Credits = Credits::from_hundredths(400);

impl Credits {
    /// An empty balance.
    pub const ZERO: Self = Self(0);

    /// Build an amount from a count of hundredths.
    #[must_use]
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// The amount as a count of hundredths.
    #[must_use]
    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// True when this balance can pay `cost` in full.
    #[must_use]
    pub const fn covers(self, cost: Self) -> bool {
        self.0 >= cost.0
    }

    /// Subtract `amount`, or `None` when the result would be negative.
    #[must_use]
    pub fn checked_sub(self, amount: Self) -> Option<Self> {
        self.0.checked_sub(amount.0).map(Self)
    }

    /// Add `amount`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, amount: Self) -> Option<Self> {
        self.0.checked_add(amount.0).map(Self)
    }

    /// Predictions this balance can still pay for: `floor(credits / 0.04)`.
    #[must_use]
    pub const fn remaining_predictions(self) -> u64 {
        self.0 / UNIT_COST.0
    }

    /// Decimal rendering used on the wire.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "balances stay far below 2^53 hundredths"
    )]
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / HUNDREDTHS_PER_CREDIT as f64
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0 / HUNDREDTHS_PER_CREDIT,
            self.0 % HUNDREDTHS_PER_CREDIT
        )
    }
}

impl Serialize for Credits {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_decimal())
    }
}

/// Snapshot of an account's ledger state.
///
/// `remaining_predictions` is derived on every call rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditBalance {
    credits: Credits,
    total_predictions: u64,
}

impl CreditBalance {
    /// Build a snapshot from its stored parts.
    #[must_use]
    pub const fn new(credits: Credits, total_predictions: u64) -> Self {
        Self {
            credits,
            total_predictions,
        }
    }

    /// Current balance.
    #[must_use]
    pub const fn credits(&self) -> Credits {
        self.credits
    }

    /// Predictions paid for so far.
    #[must_use]
    pub const fn total_predictions(&self) -> u64 {
        self.total_predictions
    }

    /// Predictions the current balance still covers.
    #[must_use]
    pub const fn remaining_predictions(&self) -> u64 {
        self.credits.remaining_predictions()
    }
}
