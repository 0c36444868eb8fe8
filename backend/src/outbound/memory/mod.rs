//! In-process account store for development and tests.
//!
//! Accounts live in a map behind a single mutex. The conditional deduction
//! holds that lock across the check and the update, which makes it atomic
//! with respect to every other operation on the store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, DeductionOutcome, StoredCredentials,
};
use crate::domain::{Account, CreditBalance, Credits, EmailAddress, PasswordHash, UserId};

#[derive(Debug, Clone)]
struct Entry {
    account: Account,
    password_hash: PasswordHash,
}

#[derive(Debug, Default)]
struct Store {
    by_id: HashMap<UserId, Entry>,
    id_by_email: HashMap<EmailAddress, UserId>,
}

/// Mutex-guarded account repository held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    store: Mutex<Store>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, AccountRepositoryError> {
        self.store
            .lock()
            .map_err(|_| AccountRepositoryError::query("in-memory account store poisoned"))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(
        &self,
        account: &Account,
        password_hash: &PasswordHash,
    ) -> Result<(), AccountRepositoryError> {
        let mut store = self.lock()?;
        if store.id_by_email.contains_key(account.email()) {
            return Err(AccountRepositoryError::duplicate_email(
                account.email().as_ref(),
            ));
        }
        store
            .id_by_email
            .insert(account.email().clone(), account.id().clone());
        store.by_id.insert(
            account.id().clone(),
            Entry {
                account: account.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let store = self.lock()?;
        Ok(store.by_id.get(id).map(|entry| entry.account.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let store = self.lock()?;
        let found = store
            .id_by_email
            .get(email)
            .and_then(|id| store.by_id.get(id))
            .map(|entry| StoredCredentials {
                account: entry.account.clone(),
                password_hash: entry.password_hash.clone(),
            });
        Ok(found)
    }

    async fn try_deduct(
        &self,
        id: &UserId,
        amount: Credits,
    ) -> Result<DeductionOutcome, AccountRepositoryError> {
        let mut store = self.lock()?;
        let Some(entry) = store.by_id.get_mut(id) else {
            return Ok(DeductionOutcome::AccountMissing);
        };

        let current = entry.account.balance();
        let Some(credits) = current.credits().checked_sub(amount) else {
            return Ok(DeductionOutcome::Insufficient(current));
        };
        let total_predictions = current
            .total_predictions()
            .checked_add(1)
            .ok_or_else(|| AccountRepositoryError::query("prediction counter overflow"))?;

        let updated = CreditBalance::new(credits, total_predictions);
        entry.account = entry.account.clone().with_balance(updated);
        Ok(DeductionOutcome::Applied(updated))
    }
}
