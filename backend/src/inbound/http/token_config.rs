//! Bearer token configuration parsing and validation.
//!
//! The HMAC signing key and token lifetime come from the environment so they
//! can be rotated without a rebuild. Release builds refuse to start without a
//! real key; debug builds fall back to an ephemeral one and say so.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

pub mod fingerprint;

pub const KEY_FILE_ENV: &str = "TOKEN_KEY_FILE";
pub const TTL_MINUTES_ENV: &str = "TOKEN_TTL_MINUTES";
pub const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";

const TOKEN_KEY_DEFAULT_PATH: &str = "/var/run/secrets/token_key";
/// HS256 keys shorter than the digest size weaken the MAC.
pub const TOKEN_KEY_MIN_LEN: usize = 32;
/// Seven days.
pub const DEFAULT_TTL_MINUTES: i64 = 10_080;
const MAX_TTL_MINUTES: i64 = 525_600;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a whole number of minutes between 1 and 525600";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require a readable key of adequate length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bloom_backend::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated token settings.
pub struct TokenSettings {
    key: Zeroizing<Vec<u8>>,
    ttl: Duration,
    ephemeral: bool,
}

impl TokenSettings {
    /// HMAC signing key material.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether the key was generated at startup. Tokens signed with an
    /// ephemeral key stop verifying after a restart.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Short fingerprint for logs; never the key itself.
    pub fn fingerprint(&self) -> String {
        fingerprint::key_fingerprint(&self.key)
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("key", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the signing key file failed.
    #[error("failed to read token key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The signing key is too short for release builds.
    #[error("token key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not sign with a generated key.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// `key_file` takes precedence over `TOKEN_KEY_FILE`, which in turn takes
/// precedence over `/var/run/secrets/token_key`.
///
/// # Examples
///
/// ```rust
/// use bloom_backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("token_key_example");
/// std::fs::write(&key_path, vec![b'k'; 32])?;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "TOKEN_TTL_MINUTES" => Some("60".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release, Some(key_path.as_path()))?;
/// assert_eq!(settings.ttl(), chrono::Duration::minutes(60));
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    key_file: Option<&Path>,
) -> Result<TokenSettings, TokenConfigError> {
    let ttl = ttl_from_env(env, mode)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = key_file
        .map(Path::to_path_buf)
        .or_else(|| env.string(KEY_FILE_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(TOKEN_KEY_DEFAULT_PATH));

    let (key, ephemeral) = match std::fs::read(&path) {
        Ok(bytes) => (checked_key(Zeroizing::new(bytes), &path, mode)?, false),
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary token key (dev only); tokens will not survive a restart"
            );
            (ephemeral_key(), true)
        }
        Err(error) => {
            return Err(TokenConfigError::KeyRead {
                path,
                source: error,
            });
        }
    };

    Ok(TokenSettings {
        key,
        ttl,
        ephemeral,
    })
}

fn checked_key(
    key: Zeroizing<Vec<u8>>,
    path: &Path,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let length = key.len();
    if length >= TOKEN_KEY_MIN_LEN {
        return Ok(key);
    }
    if mode.is_debug() && length > 0 {
        warn!(
            path = %path.display(),
            length,
            "token key shorter than {TOKEN_KEY_MIN_LEN} bytes (dev only)"
        );
        return Ok(key);
    }
    Err(TokenConfigError::KeyTooShort {
        path: path.to_path_buf(),
        length,
        min_len: TOKEN_KEY_MIN_LEN,
    })
}

fn ephemeral_key() -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0_u8; TOKEN_KEY_MIN_LEN]);
    rand::thread_rng().fill_bytes(&mut key);
    key
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, TokenConfigError> {
    let Some(value) = env.string(TTL_MINUTES_ENV) else {
        return Ok(Duration::minutes(DEFAULT_TTL_MINUTES));
    };
    match value.trim().parse::<i64>() {
        Ok(minutes) if (1..=MAX_TTL_MINUTES).contains(&minutes) => Ok(Duration::minutes(minutes)),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid TOKEN_TTL_MINUTES; using the 7 day default");
            Ok(Duration::minutes(DEFAULT_TTL_MINUTES))
        }
        _ => Err(TokenConfigError::InvalidEnv {
            name: TTL_MINUTES_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match (parse_bool(&value), mode) {
        (Some(true), BuildMode::Release) => Err(TokenConfigError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(flag),
        (None, BuildMode::Debug) => {
            warn!(value = %value, "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to disabled");
            Ok(false)
        }
        (None, BuildMode::Release) => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
