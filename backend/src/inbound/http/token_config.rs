//! Token signing secret loading and validation.
//!
//! The bearer tokens issued by `/login` are signed with a secret read from a
//! file. Release builds insist on a real file of adequate length; debug
//! builds fall back to a random secret so local runs need no setup.

use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

const TOKEN_SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const TOKEN_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;
const SECRET_FILE_ENV: &str = "KEY_INVENTORY_TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "KEY_INVENTORY_ALLOW_EPHEMERAL_SECRET";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and generate one.
    Debug,
    /// Release builds require a secret file unless explicitly overridden.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use key_inventory::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
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

/// Secret bytes used to sign bearer tokens. Wiped on drop.
pub struct TokenSecret {
    bytes: Zeroizing<Vec<u8>>,
}

impl TokenSecret {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    fn generate() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Truncated SHA-256 of the secret as lowercase hex.
    ///
    /// Safe to log; lets operators tell which secret a process loaded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use key_inventory::inbound::http::token_config::TokenSecret;
    ///
    /// let fp = TokenSecret::from_bytes(vec![b'a'; 32]).fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSecret")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Errors raised while loading the token secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file exists but is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the token signing secret from the environment.
///
/// # Examples
///
/// ```rust
/// use key_inventory::inbound::http::token_config::{token_secret_from_env, BuildMode};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = std::env::temp_dir().join("token_secret_example");
/// std::fs::write(&path, vec![b'a'; 32])?;
///
/// let path_str = path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "KEY_INVENTORY_TOKEN_SECRET_FILE" => Some(path_str.clone()),
///     _ => None,
/// });
///
/// let secret = token_secret_from_env(&env, BuildMode::Release)?;
/// assert_eq!(secret.as_bytes().len(), 32);
///
/// std::fs::remove_file(&path)?;
/// # Ok(())
/// # }
/// ```
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| TOKEN_SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let secret = TokenSecret::from_bytes(bytes);
            let length = secret.as_bytes().len();
            if mode == BuildMode::Release && length < TOKEN_SECRET_MIN_LEN {
                return Err(TokenConfigError::SecretTooShort {
                    path,
                    length,
                    min_len: TOKEN_SECRET_MIN_LEN,
                });
            }
            Ok(secret)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary token secret (dev only)"
                );
                Ok(TokenSecret::generate())
            } else {
                Err(TokenConfigError::SecretRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(
                value = %value,
                "invalid KEY_INVENTORY_ALLOW_EPHEMERAL_SECRET; defaulting to disabled"
            );
            Ok(false)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
