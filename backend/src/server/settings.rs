//! Server settings loaded via OrthoConfig from CLI flags, `BLOOM_*`
//! environment variables and configuration files.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Startup configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOOM")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without one, accounts live in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Token signing key path, overriding `TOKEN_KEY_FILE`.
    pub token_key_file: Option<PathBuf>,
}

impl ServerSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "BLOOM_BIND_ADDR",
        "BLOOM_DATABASE_URL",
        "BLOOM_POOL_MAX_SIZE",
        "BLOOM_TOKEN_KEY_FILE",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("bloom-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_use_memory_store_on_port_8080() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.pool_max_size(), 10);
        assert!(settings.token_key_file.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("BLOOM_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "BLOOM_DATABASE_URL",
                Some("postgres://bloom@localhost/bloom".to_owned()),
            ),
            ("BLOOM_POOL_MAX_SIZE", Some("4".to_owned())),
            ("BLOOM_TOKEN_KEY_FILE", Some("/etc/bloom/token_key".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://bloom@localhost/bloom")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(
            settings.token_key_file,
            Some(PathBuf::from("/etc/bloom/token_key"))
        );
    }

    #[rstest]
    fn blank_database_url_means_memory_store() {
        let _guard = lock_env([
            ("BLOOM_BIND_ADDR", None::<String>),
            ("BLOOM_DATABASE_URL", Some("   ".to_owned())),
            ("BLOOM_POOL_MAX_SIZE", None::<String>),
            ("BLOOM_TOKEN_KEY_FILE", None::<String>),
        ]);

        assert!(load_from_empty_args().database_url().is_none());
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env([
            ("BLOOM_BIND_ADDR", Some("localhost".to_owned())),
            ("BLOOM_DATABASE_URL", None::<String>),
            ("BLOOM_POOL_MAX_SIZE", None::<String>),
            ("BLOOM_TOKEN_KEY_FILE", None::<String>),
        ]);

        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
