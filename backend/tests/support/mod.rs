//! Shared harness for HTTP integration tests against the in-memory store.

use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use key_inventory::Trace;
use key_inventory::domain::SpareReconciler;
use key_inventory::domain::ports::StaticCredentialVerifier;
use key_inventory::inbound::http::configure;
use key_inventory::inbound::http::error::{json_config, path_config};
use key_inventory::inbound::http::state::{HttpState, HttpStatePorts};
use key_inventory::outbound::memory::MemoryInventory;
use key_inventory::outbound::token::JwtTokenAuthority;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "123456";
pub const SPARE_USER_ID: i64 = 87;
pub const TOKEN_TTL_HOURS: i64 = 1;

/// Clock the tests move by hand.
pub struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    pub fn new() -> Arc<Self> {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid start time");
        Arc::new(Self(Mutex::new(start)))
    }

    pub fn advance(&self, delta: Duration) {
        *self.0.lock().expect("clock lock") += delta;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// Handler state over a fresh in-memory store.
pub fn memory_state(clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(MemoryInventory::new(SpareReconciler::default()));
    HttpState::new(HttpStatePorts {
        keys: store.clone(),
        users: store.clone(),
        assignments: store.clone(),
        overview: store,
        credentials: Arc::new(StaticCredentialVerifier::new(USERNAME, PASSWORD)),
        tokens: Arc::new(JwtTokenAuthority::new(
            b"integration-test-secret-0123456789abcdef",
            Duration::hours(TOKEN_TTL_HOURS),
            clock,
        )),
    })
}

/// App wired the way the server wires it, minus the probes and docs.
pub fn inventory_app(
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
        .wrap(Trace)
        .configure(configure)
}

/// Send a request and decode the JSON body (`Value::Null` when empty).
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// `POST /login` with the operator account.
pub fn login_request() -> test::TestRequest {
    test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": USERNAME, "password": PASSWORD }))
}

/// `Authorization` value built from a successful login response.
pub fn bearer_from(status: StatusCode, body: &Value) -> String {
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let token = body["token"].as_str().expect("token string");
    format!("Bearer {token}")
}

/// Authenticated request builder.
pub fn authed(method: actix_web::http::Method, uri: &str, bearer: &str) -> test::TestRequest {
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((AUTHORIZATION, bearer.to_owned()))
}
