//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use bloom_backend::inbound::http::token_config::TokenSettings;
use bloom_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) tokens: TokenSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with the in-process account store.
    #[must_use]
    pub fn new(tokens: TokenSettings, bind_addr: SocketAddr) -> Self {
        Self {
            tokens,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool so accounts persist in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
