//! Credential and token adapters.
//!
//! - `Argon2CredentialHasher` implements `CredentialHasher` with Argon2id.
//! - `JwtTokenService` implements `TokenIssuer` and `TokenVerifier` with
//!   HS256-signed JSON Web Tokens.

mod argon2_hasher;
mod jwt_token_service;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_token_service::JwtTokenService;
