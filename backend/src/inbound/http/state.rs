//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CreditLedger, LoginService, SignupService, TokenVerifier, UserProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub signup: Arc<dyn SignupService>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub ledger: Arc<dyn CreditLedger>,
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub signup: Arc<dyn SignupService>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub ledger: Arc<dyn CreditLedger>,
    /// Resolves bearer tokens for the [`AuthenticatedUser`] extractor.
    ///
    /// [`AuthenticatedUser`]: super::auth::AuthenticatedUser
    pub tokens: Arc<dyn TokenVerifier>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use bloom_backend::domain::{AccountService, CreditLedgerService};
    /// use bloom_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use bloom_backend::outbound::memory::InMemoryAccountRepository;
    /// use bloom_backend::outbound::security::{Argon2CredentialHasher, JwtTokenService};
    /// use mockable::DefaultClock;
    ///
    /// let accounts = Arc::new(InMemoryAccountRepository::new());
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = Arc::new(JwtTokenService::new(
    ///     &[7_u8; 32],
    ///     chrono::Duration::days(7),
    ///     clock.clone(),
    /// ));
    /// let service = Arc::new(AccountService::new(
    ///     accounts.clone(),
    ///     Arc::new(Argon2CredentialHasher::default()),
    ///     tokens.clone(),
    ///     clock,
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     signup: service.clone(),
    ///     login: service.clone(),
    ///     profile: service,
    ///     ledger: Arc::new(CreditLedgerService::new(accounts)),
    ///     tokens,
    /// });
    /// let _ledger = state.ledger.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            signup,
            login,
            profile,
            ledger,
            tokens,
        } = ports;
        Self {
            signup,
            login,
            profile,
            ledger,
            tokens,
        }
    }
}
