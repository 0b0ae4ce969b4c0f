//! HTTP inbound adapter exposing REST endpoints.

pub mod assignments;
pub mod auth;
pub mod error;
pub mod health;
pub mod keys;
pub mod overview;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the inventory endpoints and the login pair.
///
/// Health probes are mounted separately because they need no `HttpState`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::check_auth)
        .service(keys::list_keys)
        .service(keys::create_key)
        .service(keys::update_key)
        .service(keys::delete_key)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(assignments::list_assignments)
        .service(assignments::create_assignment)
        .service(assignments::update_assignment)
        .service(assignments::delete_assignment)
        .service(overview::over_all)
        .service(overview::export);
}
