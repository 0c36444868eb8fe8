//! Driving port for profile reads.

use async_trait::async_trait;

use crate::domain::{Account, Error, UserId};

/// Domain use-case port for reading the authenticated account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the account for `user_id`, or `not_found`.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Account, Error>;
}
