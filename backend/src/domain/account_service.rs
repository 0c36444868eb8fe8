//! Account domain service: signup, login and profile reads.
//!
//! Password hashing and token issuance are injected capabilities, so this
//! module never touches a concrete algorithm or signing key.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::credit_ledger_service::{account_not_found, map_repository_error};
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CredentialHasher, CredentialHasherError,
    LoginService, SignupService, TokenIssuer, TokenServiceError, UserProfileQuery,
};
use crate::domain::{
    Account, AuthenticatedAccount, EmailAddress, Error, LoginCredentials, SignupRequest, UserId,
};

/// Account service implementing the signup, login and profile ports.
#[derive(Clone)]
pub struct AccountService<R> {
    accounts: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<R> AccountService<R> {
    /// Create a new service from its collaborators.
    pub fn new(
        accounts: Arc<R>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
            clock,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid email or password")
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(format!("credential hasher error: {error}"))
}

fn map_token_error(error: TokenServiceError) -> Error {
    Error::internal(format!("token issuance failed: {error}"))
}

impl<R> AccountService<R>
where
    R: AccountRepository,
{
    fn issue_for(&self, account: Account) -> Result<AuthenticatedAccount, Error> {
        let token = self
            .tokens
            .issue(account.id(), account.email())
            .map_err(map_token_error)?;
        Ok(AuthenticatedAccount { token, account })
    }
}

#[async_trait]
impl<R> SignupService for AccountService<R>
where
    R: AccountRepository,
{
    async fn signup(&self, request: &SignupRequest) -> Result<AuthenticatedAccount, Error> {
        let password_hash = self
            .hasher
            .hash(request.password())
            .map_err(map_hasher_error)?;
        let account = Account::open(
            request.name().clone(),
            request.email().clone(),
            self.clock.utc(),
        );

        match self.accounts.insert(&account, &password_hash).await {
            Ok(()) => {}
            Err(AccountRepositoryError::DuplicateEmail { .. }) => {
                debug!(email = %request.email(), "signup rejected: email already registered");
                return Err(
                    Error::conflict("an account with this email already exists").with_details(
                        json!({ "field": "email", "code": "email_taken" }),
                    ),
                );
            }
            Err(other) => return Err(map_repository_error(other)),
        }

        info!(user_id = %account.id(), "account opened");
        self.issue_for(account)
    }
}

#[async_trait]
impl<R> LoginService for AccountService<R>
where
    R: AccountRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedAccount, Error> {
        // An address that fails validation can never have registered.
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(invalid_credentials());
        };

        let Some(stored) = self
            .accounts
            .find_credentials_by_email(&email)
            .await
            .map_err(map_repository_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(user_id = %stored.account.id(), "login rejected: password mismatch");
            return Err(invalid_credentials());
        }

        info!(user_id = %stored.account.id(), "login succeeded");
        self.issue_for(stored.account)
    }
}

#[async_trait]
impl<R> UserProfileQuery for AccountService<R>
where
    R: AccountRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Account, Error> {
        self.accounts
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(account_not_found)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
