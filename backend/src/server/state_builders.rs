//! Builders wiring adapters into the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use bloom_backend::domain::ports::AccountRepository;
use bloom_backend::domain::{AccountService, CreditLedgerService};
use bloom_backend::inbound::http::state::{HttpState, HttpStatePorts};
use bloom_backend::outbound::memory::InMemoryAccountRepository;
use bloom_backend::outbound::persistence::DieselAccountRepository;
use bloom_backend::outbound::security::{Argon2CredentialHasher, JwtTokenService};

use super::ServerConfig;

/// Wire every port over one shared repository so the ledger and the account
/// service observe the same balances.
fn http_state_over<R>(
    accounts: Arc<R>,
    tokens: Arc<JwtTokenService>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    R: AccountRepository + 'static,
{
    let accounts_service = Arc::new(AccountService::new(
        accounts.clone(),
        Arc::new(Argon2CredentialHasher::new()),
        tokens.clone(),
        clock,
    ));
    HttpState::new(HttpStatePorts {
        signup: accounts_service.clone(),
        login: accounts_service.clone(),
        profile: accounts_service,
        ledger: Arc::new(CreditLedgerService::new(accounts)),
        tokens,
    })
}

/// Build the HTTP state, using PostgreSQL when a pool is configured and the
/// in-process store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = Arc::new(JwtTokenService::new(
        config.tokens.key(),
        config.tokens.ttl(),
        clock.clone(),
    ));

    match &config.db_pool {
        Some(pool) => http_state_over(
            Arc::new(DieselAccountRepository::new(pool.clone())),
            tokens,
            clock,
        ),
        None => {
            warn!("no database configured; accounts are kept in memory and lost on restart");
            http_state_over(Arc::new(InMemoryAccountRepository::new()), tokens, clock)
        }
    }
}
