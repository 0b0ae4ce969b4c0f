//! Driving port for issuing and checking bearer session tokens.

use crate::domain::{Error, Principal, SessionToken};

#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Sign a token for `principal` expiring after the configured lifetime.
    fn issue(&self, principal: &Principal) -> Result<SessionToken, Error>;

    /// Check signature and expiry, returning `unauthorized` on any failure.
    fn verify(&self, token: &str) -> Result<Principal, Error>;
}
