//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::domain::ports::StaticCredentialVerifier;
use crate::domain::{Principal, SpareReconciler};
use crate::inbound::http::configure;
use crate::inbound::http::error::{json_config, path_config};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryInventory;
use crate::outbound::token::JwtTokenAuthority;

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "123456";
const TEST_SECRET: &[u8] = b"inbound-http-test-secret-0123456789";

/// State backed by a fresh in-memory store and a real token authority.
pub fn memory_state() -> HttpState {
    let store = Arc::new(MemoryInventory::new(SpareReconciler::default()));
    HttpState::new(HttpStatePorts {
        keys: store.clone(),
        users: store.clone(),
        assignments: store.clone(),
        overview: store,
        credentials: Arc::new(StaticCredentialVerifier::new(TEST_USERNAME, TEST_PASSWORD)),
        tokens: Arc::new(JwtTokenAuthority::new(
            TEST_SECRET,
            chrono::Duration::hours(1),
            Arc::new(DefaultClock),
        )),
    })
}

/// `Authorization` header carrying a token issued by `state`.
pub fn bearer(state: &HttpState) -> (actix_web::http::header::HeaderName, String) {
    let token = state
        .tokens
        .issue(&Principal::new(TEST_USERNAME))
        .expect("test token issues");
    (AUTHORIZATION, format!("Bearer {}", token.as_str()))
}

/// App wired like the server: state, extractor error handlers and every
/// inventory route.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(path_config())
        .configure(configure)
}
