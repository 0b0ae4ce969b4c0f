//! Assignment handlers. Writes go through the spare reconciler behind
//! `AssignmentService`, so each one either moves stock atomically or
//! changes nothing.
//!
//! ```text
//! GET    /assign
//! POST   /assign      {"user_id":1,"key_id":2,"quantity":1}
//! PUT    /assign/{id}
//! DELETE /assign/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Assignment, AssignmentDraft, AssignmentId, Error, KeyId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, map_assignment_validation_error, missing_input_error,
};

/// Body for `POST /assign` and `PUT /assign/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AssignmentRequest {
    #[schema(example = 88)]
    pub user_id: Option<UserId>,
    #[schema(example = 1)]
    pub key_id: Option<KeyId>,
    #[schema(example = 2, minimum = 0)]
    pub quantity: Option<i32>,
}

impl TryFrom<AssignmentRequest> for AssignmentDraft {
    type Error = Error;

    fn try_from(value: AssignmentRequest) -> Result<Self, Self::Error> {
        let user_id = value
            .user_id
            .ok_or_else(|| missing_input_error(FieldName::new("user_id")))?;
        let key_id = value
            .key_id
            .ok_or_else(|| missing_input_error(FieldName::new("key_id")))?;
        let quantity = value
            .quantity
            .ok_or_else(|| missing_input_error(FieldName::new("quantity")))?;
        AssignmentDraft::try_new(user_id, key_id, quantity).map_err(map_assignment_validation_error)
    }
}

/// List every assignment, names resolved from live rows where possible.
#[utoipa::path(
    get,
    path = "/assign",
    responses(
        (status = 200, description = "Assignments", body = [Assignment]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "listAssignments"
)]
#[get("/assign")]
pub async fn list_assignments(
    _session: BearerSession,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Assignment>>> {
    let rows = state.assignments.list_assignments().await?;
    Ok(web::Json(rows))
}

/// Hand `quantity` copies of a key from the spare holder to a user.
#[utoipa::path(
    post,
    path = "/assign",
    request_body = AssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 400, description = "Invalid input, unknown user or key, or insufficient spare stock", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "createAssignment"
)]
#[post("/assign")]
pub async fn create_assignment(
    _session: BearerSession,
    state: web::Data<HttpState>,
    payload: web::Json<AssignmentRequest>,
) -> ApiResult<HttpResponse> {
    let draft = AssignmentDraft::try_from(payload.into_inner())?;
    let created = state.assignments.create_assignment(draft).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Change the holder, key or quantity of an assignment.
#[utoipa::path(
    put,
    path = "/assign/{id}",
    params(("id" = i32, Path, description = "Assignment identifier")),
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 400, description = "Invalid input, unknown user or key, or insufficient spare stock", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Record not found", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "updateAssignment"
)]
#[put("/assign/{id}")]
pub async fn update_assignment(
    _session: BearerSession,
    state: web::Data<HttpState>,
    path: web::Path<AssignmentId>,
    payload: web::Json<AssignmentRequest>,
) -> ApiResult<web::Json<Assignment>> {
    let draft = AssignmentDraft::try_from(payload.into_inner())?;
    let updated = state
        .assignments
        .update_assignment(path.into_inner(), draft)
        .await?;
    Ok(web::Json(updated))
}

/// Remove an assignment and return its stock to the spare holder.
#[utoipa::path(
    delete,
    path = "/assign/{id}",
    params(("id" = i32, Path, description = "Assignment identifier")),
    responses(
        (status = 200, description = "Assignment deleted", body = Assignment),
        (status = 400, description = "Invalid id or spare row", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Record not found", body = ErrorSchema)
    ),
    tags = ["assignments"],
    operation_id = "deleteAssignment"
)]
#[delete("/assign/{id}")]
pub async fn delete_assignment(
    _session: BearerSession,
    state: web::Data<HttpState>,
    path: web::Path<AssignmentId>,
) -> ApiResult<web::Json<Assignment>> {
    let deleted = state
        .assignments
        .delete_assignment(path.into_inner())
        .await?;
    Ok(web::Json(deleted))
}
