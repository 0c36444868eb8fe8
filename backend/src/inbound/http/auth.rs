//! Bearer token authentication for HTTP handlers.
//!
//! Handlers take an [`AuthenticatedUser`] argument and receive only the
//! resolved [`UserId`]; token parsing and verification stay here.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::warn;

use crate::domain::ports::TokenServiceError;
use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, resolved from the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Account the presented token was issued for.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("No token, authorization denied"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Token is not valid"))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("No token, authorization denied"))?;
    Ok(token)
}

fn map_token_error(error: TokenServiceError) -> Error {
    match error {
        TokenServiceError::Expired => Error::unauthorized("Token has expired"),
        TokenServiceError::Invalid { .. } => Error::unauthorized("Token is not valid"),
        TokenServiceError::Signing { message } => {
            Error::internal(format!("token verification failed: {message}"))
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
        warn!("HttpState missing from app data; rejecting bearer request");
        Error::internal("authentication is not configured")
    })?;
    let token = bearer_token(req)?;
    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(map_token_error)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
