//! Login and session check handlers.
//!
//! ```text
//! POST /login {"username":"admin","password":"123456"}  -> {"token":"..."}
//! GET  /check-auth  (Authorization: Bearer <token>)     -> {"message":"Authorized"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Login request body for `POST /login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let username = value
            .username
            .ok_or_else(|| missing_field_error(FieldName::new("username")))?;
        let password = value
            .password
            .ok_or_else(|| missing_field_error(FieldName::new("password")))?;
        Self::try_from_parts(&username, &password).map_err(map_login_validation_error)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let message = err.to_string();
    Error::invalid_request(message).with_details(json!({ "field": err.field(), "code": "blank_field" }))
}

/// Issued bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Session check result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthStatus {
    #[schema(example = "Authorized")]
    pub message: String,
}

/// Exchange operator credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let principal = state.credentials.verify(&credentials).await?;
    let token = state.tokens.issue(&principal)?;
    info!(
        username = principal.username(),
        expires_at = %token.expires_at(),
        "session token issued"
    );
    Ok(web::Json(LoginResponse {
        token: token.into_inner(),
    }))
}

/// Confirm the caller's bearer token is valid and unexpired.
#[utoipa::path(
    get,
    path = "/check-auth",
    responses(
        (status = 200, description = "Token accepted", body = AuthStatus),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "checkAuth"
)]
#[get("/check-auth")]
pub async fn check_auth(_session: BearerSession) -> web::Json<AuthStatus> {
    web::Json(AuthStatus {
        message: "Authorized".to_owned(),
    })
}
