//! Key holder handlers.
//!
//! ```text
//! GET    /users
//! POST   /users      {"name":"Ada","division":"Ops","ministry":"Works"}
//! PUT    /users/{id}
//! DELETE /users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, User, UserDraft, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::BearerSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, map_user_validation_error, require};

/// Body for `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "Facilities")]
    pub division: Option<String>,
    #[schema(example = "Public Works")]
    pub ministry: Option<String>,
}

impl TryFrom<UserRequest> for UserDraft {
    type Error = Error;

    fn try_from(value: UserRequest) -> Result<Self, Self::Error> {
        let name = require(value.name, FieldName::new("name"))?;
        UserDraft::try_new(
            name,
            value.division.unwrap_or_default(),
            value.ministry.unwrap_or_default(),
        )
        .map_err(map_user_validation_error)
    }
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

/// List every user, the spare holder included.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    _session: BearerSession,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    _session: BearerSession,
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = UserDraft::try_from(payload.into_inner())?;
    let user = state.users.create_user(draft).await?;
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    _session: BearerSession,
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<User>> {
    let draft = UserDraft::try_from(payload.into_inner())?;
    let user = state
        .users
        .update_user(path.into_inner(), draft)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(web::Json(user))
}

/// Delete a user. The spare holder is refused with 400.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = User),
        (status = 400, description = "Invalid id or spare holder", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    _session: BearerSession,
    state: web::Data<HttpState>,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<User>> {
    let user = state
        .users
        .delete_user(path.into_inner())
        .await?
        .ok_or_else(user_not_found)?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_SPARE_USER_ID;
    use crate::domain::ports::MockUserDirectory;
    use crate::inbound::http::test_utils::{bearer, memory_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn send(state: HttpState, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;
        let response =
            actix_test::call_service(&app, request.insert_header(auth).to_request()).await;
        let status = response.status();
        let value = actix_test::read_body_json(response).await;
        (status, value)
    }

    #[rstest]
    #[actix_web::test]
    async fn create_defaults_optional_columns() {
        let (status, value) = send(
            memory_state(),
            actix_test::TestRequest::post()
                .uri("/users")
                .set_json(json!({"name": "Ada"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["division"], "");
        assert_eq!(value["ministry"], "");
        assert!(value["id"].as_i64().expect("numeric id") > i64::from(DEFAULT_SPARE_USER_ID));
    }

    #[rstest]
    #[case::missing(json!({"division": "Ops"}), "missing_field")]
    #[case::blank(json!({"name": "  "}), "blank_field")]
    #[actix_web::test]
    async fn create_requires_a_name(#[case] body: Value, #[case] code: &str) {
        let (status, value) = send(
            memory_state(),
            actix_test::TestRequest::post().uri("/users").set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "Missing required fields");
        assert_eq!(value["details"], json!({"field": "name", "code": code}));
    }

    #[rstest]
    #[actix_web::test]
    async fn list_includes_spare_holder() {
        let (status, value) = send(memory_state(), actix_test::TestRequest::get().uri("/users")).await;

        assert_eq!(status, StatusCode::OK);
        let users = value.as_array().expect("array");
        assert!(users.iter().any(|user| user["id"] == DEFAULT_SPARE_USER_ID && user["name"] == "Spare"));
    }

    #[rstest]
    #[actix_web::test]
    async fn spare_holder_cannot_be_deleted() {
        let (status, value) = send(
            memory_state(),
            actix_test::TestRequest::delete().uri(&format!("/users/{DEFAULT_SPARE_USER_ID}")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["code"], "invalid_request");
    }

    #[rstest]
    #[actix_web::test]
    async fn update_missing_user_is_not_found() {
        let mut users = MockUserDirectory::new();
        users
            .expect_update_user()
            .withf(|id, draft| *id == 12 && draft.name() == "Grace")
            .times(1)
            .returning(|_, _| Ok(None));
        let mut state = memory_state();
        state.users = Arc::new(users);

        let (status, value) = send(
            state,
            actix_test::TestRequest::put()
                .uri("/users/12")
                .set_json(json!({"name": "Grace"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["error"], "User not found");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_returns_removed_user() {
        let state = memory_state();
        let created = state
            .users
            .create_user(UserDraft::try_new("Ada", "Ops", "Works").expect("draft"))
            .await
            .expect("create");

        let (status, value) = send(
            state.clone(),
            actix_test::TestRequest::delete().uri(&format!("/users/{}", created.id)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["name"], "Ada");
        assert_eq!(state.users.list_users().await.expect("list").len(), 1);
    }
}
