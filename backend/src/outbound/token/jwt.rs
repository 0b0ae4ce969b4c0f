//! HS256 JSON Web Tokens implementing `SessionTokens`.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::SessionTokens;
use crate::domain::{Error, Principal, SessionToken};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and checks session tokens with a shared secret.
///
/// Expiry is checked against the injected clock rather than the system
/// clock so tests can move time.
pub struct JwtTokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenAuthority {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl SessionTokens for JwtTokenAuthority {
    fn issue(&self, principal: &Principal) -> Result<SessionToken, Error> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: principal.username().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign session token: {err}")))?;
        Ok(SessionToken::new(token, expires_at))
    }

    fn verify(&self, token: &str) -> Result<Principal, Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| {
                debug!(error = %err, "rejected session token");
                Error::unauthorized("Unauthorized")
            })?;
        let expires_at: Option<DateTime<Utc>> = Utc.timestamp_opt(data.claims.exp, 0).single();
        match expires_at {
            Some(expires_at) if expires_at > self.clock.utc() => {
                Ok(Principal::new(data.claims.sub))
            }
            _ => {
                debug!(exp = data.claims.exp, "session token expired");
                Err(Error::unauthorized("Unauthorized"))
            }
        }
    }
}
