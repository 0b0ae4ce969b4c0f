//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use key_inventory::Trace;
#[cfg(debug_assertions)]
use key_inventory::doc::ApiDoc;
use key_inventory::inbound::http::configure;
use key_inventory::inbound::http::error::{json_config, path_config};
use key_inventory::inbound::http::health::{HealthState, live, ready};
use key_inventory::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(path_config())
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "HTTP server listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::AdminCredentials;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use key_inventory::domain::{SpareReconciler, TRACE_ID_HEADER};
    use key_inventory::inbound::http::token_config::TokenSecret;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn health_state() -> web::Data<HealthState> {
        web::Data::new(HealthState::new())
    }

    #[fixture]
    fn config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            db_pool: None,
            reconciler: SpareReconciler::default(),
            token_secret: TokenSecret::from_bytes(vec![b'z'; 32]),
            token_ttl: chrono::Duration::hours(1),
            admin: AdminCredentials {
                username: "admin".to_owned(),
                password: "123456".to_owned(),
            },
        }
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_server_marks_ready(health_state: web::Data<HealthState>, config: ServerConfig) {
        assert!(!health_state.is_ready(), "state should start unready");

        let _server = create_server(health_state.clone(), config).expect("server should build");

        assert!(health_state.is_ready(), "server creation should mark readiness");
    }

    #[rstest]
    #[actix_web::test]
    async fn app_serves_probes_and_traces_every_response(
        health_state: web::Data<HealthState>,
        config: ServerConfig,
    ) {
        health_state.mark_ready();
        let app =
            actix_test::init_service(build_app(health_state, build_http_state(&config))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/keys").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("trace id header");
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["trace_id"], trace_id);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_through_the_full_stack(
        health_state: web::Data<HealthState>,
        config: ServerConfig,
    ) {
        let app =
            actix_test::init_service(build_app(health_state, build_http_state(&config))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_json(json!({"username": "admin", "password": "123456"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
    }
}
