//! Driving port for login.
//!
//! Inbound adapters authenticate credentials through this port without
//! importing the hasher, token or persistence adapters behind it.

use async_trait::async_trait;

use crate::domain::{AuthenticatedAccount, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue an access token.
    ///
    /// Unknown emails and wrong passwords fail with the same `unauthorized`
    /// error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedAccount, Error>;
}
