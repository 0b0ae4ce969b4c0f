//! Key catalogue handlers.
//!
//! ```text
//! GET    /keys
//! POST   /keys      {"type":"Master","zone":"A","usage":"Office","keyname":"Front","total_no_of_key":5}
//! PUT    /keys/{id}
//! DELETE /keys/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Key, KeyDraft, KeyDraftParts, KeyId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_key_validation_error, require};

/// Body for `POST /keys` and `PUT /keys/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct KeyRequest {
    #[serde(rename = "type")]
    #[schema(example = "Master")]
    pub key_type: Option<String>,
    #[schema(example = "North")]
    pub zone: Option<String>,
    #[schema(example = "Plant room")]
    pub usage: Option<String>,
    #[schema(example = "K-101")]
    pub keyname: Option<String>,
    pub keydescription: Option<String>,
    pub keytag: Option<String>,
    #[schema(example = 5, minimum = 0)]
    pub total_no_of_key: Option<i32>,
}

impl TryFrom<KeyRequest> for KeyDraft {
    type Error = Error;

    fn try_from(value: KeyRequest) -> Result<Self, Self::Error> {
        let parts = KeyDraftParts {
            key_type: require(value.key_type, FieldName::new("type"))?,
            zone: require(value.zone, FieldName::new("zone"))?,
            usage: require(value.usage, FieldName::new("usage"))?,
            keyname: require(value.keyname, FieldName::new("keyname"))?,
            keydescription: value.keydescription.unwrap_or_default(),
            keytag: value.keytag.unwrap_or_default(),
            total_no_of_key: require(value.total_no_of_key, FieldName::new("total_no_of_key"))?,
        };
        KeyDraft::try_new(parts).map_err(map_key_validation_error)
    }
}

fn key_not_found() -> Error {
    Error::not_found("Key not found")
}

/// List every key.
#[utoipa::path(
    get,
    path = "/keys",
    responses(
        (status = 200, description = "Keys", body = [Key]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["keys"],
    operation_id = "listKeys"
)]
#[get("/keys")]
pub async fn list_keys(
    _session: BearerSession,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Key>>> {
    let keys = state.keys.list_keys().await?;
    Ok(web::Json(keys))
}

/// Create a key; its whole stock starts on the spare holder.
#[utoipa::path(
    post,
    path = "/keys",
    request_body = KeyRequest,
    responses(
        (status = 201, description = "Key created", body = Key),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["keys"],
    operation_id = "createKey"
)]
#[post("/keys")]
pub async fn create_key(
    _session: BearerSession,
    state: web::Data<HttpState>,
    payload: web::Json<KeyRequest>,
) -> ApiResult<HttpResponse> {
    let draft = KeyDraft::try_from(payload.into_inner())?;
    let key = state.keys.create_key(draft).await?;
    Ok(HttpResponse::Created().json(key))
}

/// Overwrite a key. A change of total moves through the spare row.
#[utoipa::path(
    put,
    path = "/keys/{id}",
    params(("id" = i32, Path, description = "Key identifier")),
    request_body = KeyRequest,
    responses(
        (status = 200, description = "Key updated", body = Key),
        (status = 400, description = "Invalid request or insufficient spare stock", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Key not found", body = ErrorSchema)
    ),
    tags = ["keys"],
    operation_id = "updateKey"
)]
#[put("/keys/{id}")]
pub async fn update_key(
    _session: BearerSession,
    state: web::Data<HttpState>,
    path: web::Path<KeyId>,
    payload: web::Json<KeyRequest>,
) -> ApiResult<web::Json<Key>> {
    let draft = KeyDraft::try_from(payload.into_inner())?;
    let key = state
        .keys
        .update_key(path.into_inner(), draft)
        .await?
        .ok_or_else(key_not_found)?;
    Ok(web::Json(key))
}

/// Delete a key. Assignments referencing it are kept.
#[utoipa::path(
    delete,
    path = "/keys/{id}",
    params(("id" = i32, Path, description = "Key identifier")),
    responses(
        (status = 200, description = "Key deleted", body = Key),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Key not found", body = ErrorSchema)
    ),
    tags = ["keys"],
    operation_id = "deleteKey"
)]
#[delete("/keys/{id}")]
pub async fn delete_key(
    _session: BearerSession,
    state: web::Data<HttpState>,
    path: web::Path<KeyId>,
) -> ApiResult<web::Json<Key>> {
    let key = state
        .keys
        .delete_key(path.into_inner())
        .await?
        .ok_or_else(key_not_found)?;
    Ok(web::Json(key))
}
