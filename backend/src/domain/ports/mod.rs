//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`CreditLedger`, `SignupService`, `LoginService`,
//! `UserProfileQuery`) are called by inbound adapters and fail with the domain
//! [`Error`](crate::domain::Error). Driven ports (`AccountRepository`,
//! `CredentialHasher`, `TokenIssuer`, `TokenVerifier`) are implemented by
//! outbound adapters and expose their own typed errors.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod credential_hasher;
mod credit_ledger;
mod login_service;
mod signup_service;
mod token_service;
mod user_profile_query;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, DeductionOutcome, StoredCredentials,
};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use credit_ledger::MockCreditLedger;
pub use credit_ledger::CreditLedger;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use signup_service::MockSignupService;
pub use signup_service::SignupService;
#[cfg(test)]
pub use token_service::{MockTokenIssuer, MockTokenVerifier};
pub use token_service::{TokenIssuer, TokenServiceError, TokenVerifier};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
