//! Credit ledger domain service.
//!
//! Implements [`CreditLedger`] over an [`AccountRepository`]. The service adds
//! no locking of its own: deduction safety comes entirely from the
//! repository's conditional update, so a prior eligibility check is never
//! required.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CreditLedger, DeductionOutcome,
};
use crate::domain::{CreditBalance, Credits, Error, UserId};

/// Credit ledger service implementing the driving port.
#[derive(Clone)]
pub struct CreditLedgerService<R> {
    accounts: Arc<R>,
}

impl<R> CreditLedgerService<R> {
    /// Create a new service over the given repository.
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }
}

/// Map driven-port failures onto the domain error taxonomy.
pub(crate) fn map_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { .. } => {
            Error::conflict("an account with this email already exists")
        }
    }
}

pub(crate) fn account_not_found() -> Error {
    Error::not_found("account not found")
}

fn insufficient_credits(balance: CreditBalance, required: Credits) -> Error {
    Error::insufficient_credits("Insufficient credits").with_details(json!({
        "credits": balance.credits(),
        "required": required,
    }))
}

impl<R> CreditLedgerService<R>
where
    R: AccountRepository,
{
    async fn load_balance(&self, user_id: &UserId) -> Result<CreditBalance, Error> {
        self.accounts
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?
            .map(|account| account.balance())
            .ok_or_else(account_not_found)
    }
}

#[async_trait]
impl<R> CreditLedger for CreditLedgerService<R>
where
    R: AccountRepository,
{
    async fn balance(&self, user_id: &UserId) -> Result<CreditBalance, Error> {
        self.load_balance(user_id).await
    }

    async fn has_sufficient_credits(
        &self,
        user_id: &UserId,
        cost: Credits,
    ) -> Result<bool, Error> {
        let balance = self.load_balance(user_id).await?;
        Ok(balance.credits().covers(cost))
    }

    async fn deduct(&self, user_id: &UserId, amount: Credits) -> Result<CreditBalance, Error> {
        if amount.is_zero() {
            return Err(Error::invalid_request("deduction amount must be positive")
                .with_details(json!({ "field": "amount", "code": "zero_amount" })));
        }

        let outcome = self
            .accounts
            .try_deduct(user_id, amount)
            .await
            .map_err(map_repository_error)?;

        match outcome {
            DeductionOutcome::Applied(balance) => {
                info!(
                    user_id = %user_id,
                    amount = %amount,
                    credits = %balance.credits(),
                    total_predictions = balance.total_predictions(),
                    "credits deducted"
                );
                Ok(balance)
            }
            DeductionOutcome::Insufficient(balance) => {
                debug!(
                    user_id = %user_id,
                    amount = %amount,
                    credits = %balance.credits(),
                    "deduction refused: insufficient credits"
                );
                Err(insufficient_credits(balance, amount))
            }
            DeductionOutcome::AccountMissing => Err(account_not_found()),
        }
    }
}

#[cfg(test)]
#[path = "credit_ledger_service_tests.rs"]
mod tests;
