//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{AuthenticatedAccount, Error, SignupRequest};

/// Domain use-case port for opening new accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Open an account with the default balance and issue an access token.
    ///
    /// Fails with `conflict` when the email is already registered.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthenticatedAccount, Error>;
}
