//! Bearer session extractor keeping handlers free of header parsing.
//!
//! Protected handlers take a [`BearerSession`] argument; extraction fails
//! with `401 Unauthorized` before the handler body (and so before any store
//! access) runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

/// Principal proven by a valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct BearerSession(Principal);

impl BearerSession {
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    fn authenticate(req: &HttpRequest) -> Result<Self, Error> {
        let state = req
            .app_data::<web::Data<HttpState>>()
            .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
        let token = bearer_token(req).ok_or_else(|| {
            debug!(path = req.path(), "missing bearer token");
            Error::unauthorized("Unauthorized")
        })?;
        state.tokens.verify(token).map(Self)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_at_checked(BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequest for BearerSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::authenticate(req))
    }
}
