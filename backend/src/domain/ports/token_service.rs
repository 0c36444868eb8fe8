//! Capability ports for issuing and verifying bearer tokens.
//!
//! The ledger never sees tokens: inbound adapters resolve a request to a
//! [`UserId`] through [`TokenVerifier`] and pass only the id onwards.

use crate::domain::{AccessToken, EmailAddress, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenServiceError {
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is malformed, tampered with or carries a bad subject.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token was valid but has expired.
        Expired => "token has expired",
    }
}

/// Issues signed access tokens for authenticated accounts.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: &UserId, email: &EmailAddress) -> Result<AccessToken, TokenServiceError>;
}

/// Resolves a presented bearer token to the account it was issued for.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<UserId, TokenServiceError>;
}
