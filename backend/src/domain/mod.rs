//! Domain primitives, aggregates and services for the credit ledger.
//!
//! Purpose: define the strongly typed account and credit model, the ports at
//! the edge of the hexagon, and the services that implement the driving
//! ports. Nothing in here knows about HTTP, SQL, password algorithms or token
//! formats.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `Account`, `UserId`, `UserName`, `EmailAddress`: validated identity.
//! - `Credits`, `CreditBalance`, `UNIT_COST`: exact ledger arithmetic.
//! - `CreditLedgerService`, `AccountService`: driving-port implementations.

pub mod account_service;
pub mod auth;
pub mod credit_ledger_service;
pub mod credits;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, AuthenticatedAccount, LoginCredentials, LoginValidationError, PASSWORD_MIN,
    PasswordHash, SignupRequest, SignupValidationError,
};
pub use self::credit_ledger_service::CreditLedgerService;
pub use self::credits::{CreditBalance, Credits, DEFAULT_BALANCE, UNIT_COST};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{
    Account, AccountParts, EmailAddress, UserId, UserName, UserValidationError,
};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
