//! Port for durable account storage.
//!
//! [`AccountRepository`] is the only path through which balances change. The
//! deduction contract is a single conditional update: adapters must apply
//! "subtract `amount` and count one prediction, only if the balance covers
//! `amount`" atomically and report which way it went.

use async_trait::async_trait;

use crate::domain::{Account, CreditBalance, Credits, EmailAddress, PasswordHash, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } =>
            "an account with email {email} already exists",
    }
}

/// Account row paired with its stored password hash, used only by login.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub account: Account,
    pub password_hash: PasswordHash,
}

/// Outcome of a conditional deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductionOutcome {
    /// The update applied; carries the post-deduction snapshot.
    Applied(CreditBalance),
    /// The balance could not cover the amount; nothing changed.
    Insufficient(CreditBalance),
    /// No account has this id.
    AccountMissing,
}

/// Port for account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a freshly opened account.
    ///
    /// Fails with [`AccountRepositoryError::DuplicateEmail`] when the
    /// normalised email is taken.
    async fn insert(
        &self,
        account: &Account,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountRepositoryError>;

    /// Fetch the current snapshot of an account.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account and its password hash by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    /// Atomically deduct `amount` and increment the prediction counter when
    /// the balance covers it.
    ///
    /// Implementations must never split this into a read followed by a
    /// separate write that another deduction could interleave with.
    async fn try_deduct(
        &self,
        id: &UserId,
        amount: Credits,
    ) -> Result<DeductionOutcome, AccountRepositoryError>;
}
