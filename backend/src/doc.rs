//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inventory endpoint, the health probes, the
//! request and response bodies, and the bearer token security scheme. The
//! domain error is described through the wrappers in
//! [`crate::inbound::http::schemas`] so the domain stays free of utoipa.
//!
//! The generated document is served by Swagger UI in debug builds and
//! printed by `cargo run --bin openapi-dump`.

use crate::domain::{Assignment, InventoryExport, Key, OverviewRow, User};
use crate::inbound::http::assignments::AssignmentRequest;
use crate::inbound::http::auth::{AuthStatus, LoginRequest, LoginResponse};
use crate::inbound::http::keys::KeyRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::UserRequest;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer token scheme referenced by secured operations.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Key inventory API",
        description = "Track physical keys, their holders and the spare stock."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::check_auth,
        crate::inbound::http::keys::list_keys,
        crate::inbound::http::keys::create_key,
        crate::inbound::http::keys::update_key,
        crate::inbound::http::keys::delete_key,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::assignments::list_assignments,
        crate::inbound::http::assignments::create_assignment,
        crate::inbound::http::assignments::update_assignment,
        crate::inbound::http::assignments::delete_assignment,
        crate::inbound::http::overview::over_all,
        crate::inbound::http::overview::export,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        Key,
        User,
        Assignment,
        OverviewRow,
        InventoryExport,
        KeyRequest,
        UserRequest,
        AssignmentRequest,
        LoginRequest,
        LoginResponse,
        AuthStatus,
    )),
    tags(
        (name = "auth", description = "Operator login and token checks"),
        (name = "keys", description = "Key catalogue"),
        (name = "users", description = "Key holders"),
        (name = "assignments", description = "Who holds how many of which key"),
        (name = "overview", description = "Joined views and full exports"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
