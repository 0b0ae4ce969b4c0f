//! Driving port for checking login credentials.
//!
//! Handlers only see the `CredentialVerifier` capability, so the single
//! configured operator account can later be replaced by a user store
//! without touching the HTTP layer.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the authenticated principal or an `unauthorized` error.
    async fn verify(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;
}

/// Verifier accepting exactly one configured username/password pair.
///
/// # Examples
/// ```
/// use key_inventory::domain::LoginCredentials;
/// use key_inventory::domain::ports::{CredentialVerifier, StaticCredentialVerifier};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let verifier = StaticCredentialVerifier::new("admin", "123456");
/// let creds = LoginCredentials::try_from_parts("admin", "123456").unwrap();
/// let principal = verifier.verify(&creds).await.unwrap();
/// assert_eq!(principal.username(), "admin");
/// # });
/// ```
#[derive(Clone)]
pub struct StaticCredentialVerifier {
    username: String,
    password: Zeroizing<String>,
}

impl StaticCredentialVerifier {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl std::fmt::Debug for StaticCredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialVerifier")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        if credentials.username() == self.username
            && credentials.password() == self.password.as_str()
        {
            Ok(Principal::new(credentials.username()))
        } else {
            Err(Error::unauthorized("Invalid credentials"))
        }
    }
}
