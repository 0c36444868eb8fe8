//! Driving port for the credit ledger use-cases.
//!
//! Inbound adapters call this port with an already-authenticated user id.
//! Failures are domain [`Error`]s: `not_found` for unknown accounts,
//! `insufficient_credits` when a deduction cannot be paid for.

use async_trait::async_trait;

use crate::domain::{CreditBalance, Credits, Error, UserId};

/// Read, check and deduct operations over a single account balance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Current balance, prediction count and derived remaining predictions.
    async fn balance(&self, user_id: &UserId) -> Result<CreditBalance, Error>;

    /// Whether the balance covers `cost`. Advisory only; never a substitute
    /// for the check inside [`CreditLedger::deduct`].
    async fn has_sufficient_credits(&self, user_id: &UserId, cost: Credits)
    -> Result<bool, Error>;

    /// Atomically deduct `amount` and count one prediction.
    async fn deduct(&self, user_id: &UserId, amount: Credits) -> Result<CreditBalance, Error>;
}
