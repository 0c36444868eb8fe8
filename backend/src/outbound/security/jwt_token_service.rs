//! HS256 JSON Web Token implementation of the token ports.
//!
//! Tokens carry the account id as `sub` plus the login email, and expire after
//! the configured TTL. Issue times come from an injected clock; expiry checks
//! use the wall clock inside `jsonwebtoken`.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::{TokenIssuer, TokenServiceError, TokenVerifier};
use crate::domain::{AccessToken, EmailAddress, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service from raw key material.
    ///
    /// The caller keeps ownership of the secret and is responsible for
    /// zeroising it.
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user_id: &UserId, email: &EmailAddress) -> Result<AccessToken, TokenServiceError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenServiceError::signing(err.to_string()))?;
        Ok(AccessToken::new(token, expires_at))
    }
}

impl TokenVerifier for JwtTokenService {
    fn verify(&self, token: &str) -> Result<UserId, TokenServiceError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenServiceError::expired(),
                _ => {
                    warn!(error = %err, "rejected bearer token");
                    TokenServiceError::invalid(err.to_string())
                }
            })?;
        UserId::new(&data.claims.sub)
            .map_err(|err| TokenServiceError::invalid(format!("bad subject: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockable::{DefaultClock, MockClock};
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[fixture]
    fn service() -> JwtTokenService {
        JwtTokenService::new(SECRET, Duration::minutes(10), Arc::new(DefaultClock))
    }

    fn email() -> EmailAddress {
        EmailAddress::new("ada@example.com").expect("valid email")
    }

    #[rstest]
    fn issued_tokens_verify_to_the_same_user(service: JwtTokenService) {
        let user_id = UserId::random();
        let token = service.issue(&user_id, &email()).expect("issue");
        assert_eq!(service.verify(token.as_str()).expect("verify"), user_id);
    }

    #[rstest]
    fn expiry_follows_the_clock_and_ttl() {
        let issued_at = Utc
            .with_ymd_and_hms(2026, 5, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(issued_at);
        let service = JwtTokenService::new(SECRET, Duration::minutes(30), Arc::new(clock));

        let token = service.issue(&UserId::random(), &email()).expect("issue");
        assert_eq!(token.expires_at(), issued_at + Duration::minutes(30));
    }

    #[rstest]
    fn expired_tokens_are_reported_as_expired() {
        let issued_at = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(issued_at);
        let service = JwtTokenService::new(SECRET, Duration::minutes(10), Arc::new(clock));

        let token = service.issue(&UserId::random(), &email()).expect("issue");
        assert_eq!(
            service.verify(token.as_str()),
            Err(TokenServiceError::Expired)
        );
    }

    #[rstest]
    fn tokens_signed_with_another_key_are_invalid(service: JwtTokenService) {
        let other = JwtTokenService::new(
            b"ffffffffffffffffffffffffffffffff",
            Duration::minutes(10),
            Arc::new(DefaultClock),
        );
        let token = other.issue(&UserId::random(), &email()).expect("issue");
        assert!(matches!(
            service.verify(token.as_str()),
            Err(TokenServiceError::Invalid { .. })
        ));
    }

    #[rstest]
    fn garbage_is_invalid(service: JwtTokenService) {
        assert!(matches!(
            service.verify("not.a.token"),
            Err(TokenServiceError::Invalid { .. })
        ));
    }
}
