//! Authentication primitives: signup and login payloads, password hashes
//! and issued access tokens.
//!
//! Inbound adapters construct these from raw strings so handlers only talk to
//! services with validated input. Plaintext passwords are held in
//! [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::user::{Account, EmailAddress, UserName, UserValidationError};

/// Minimum plaintext password length accepted at signup.
pub const PASSWORD_MIN: usize = 8;

/// Errors raised while validating login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. It is not checked for
///   shape: an address that could never register simply fails the lookup.
/// - `password` is non-empty and keeps caller whitespace.
///
/// # Examples
/// ```
/// use bloom_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "password").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while validating a signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupValidationError {
    Name(UserValidationError),
    Email(UserValidationError),
    PasswordTooShort { min: usize },
}

impl SignupValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Email(_) => "email",
            Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Name(UserValidationError::EmptyName) => "empty_name",
            Self::Name(UserValidationError::NameTooShort { .. }) => "name_too_short",
            Self::Name(UserValidationError::NameTooLong { .. }) => "name_too_long",
            Self::Email(UserValidationError::EmptyEmail) => "empty_email",
            Self::Email(UserValidationError::EmailTooLong { .. }) => "email_too_long",
            Self::Name(_) => "invalid_name",
            Self::Email(_) => "invalid_email",
            Self::PasswordTooShort { .. } => "password_too_short",
        }
    }
}

impl fmt::Display for SignupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(err) | Self::Email(err) => fmt::Display::fmt(err, f),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for SignupValidationError {}

/// Validated signup payload.
///
/// # Examples
/// ```
/// use bloom_backend::domain::SignupRequest;
///
/// let request = SignupRequest::try_from_parts("Ada", "ada@example.com", "correct horse")
///     .expect("valid signup");
/// assert_eq!(request.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct SignupRequest {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignupRequest {
    /// Validate raw signup inputs, reporting the first offending field.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, SignupValidationError> {
        let name = UserName::new(name).map_err(SignupValidationError::Name)?;
        let email = EmailAddress::new(email).map_err(SignupValidationError::Email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(SignupValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// One-way salted password hash in PHC string format.
///
/// The `Debug` output is redacted so hashes never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a credential hasher or read from
    /// storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Signed bearer token returned to clients after signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Encoded token value for the `Authorization: Bearer` header.
    pub fn as_str(&self) -> &str {
        self.token.as_str()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Result of a successful signup or login.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub token: AccessToken,
    pub account: Account,
}
