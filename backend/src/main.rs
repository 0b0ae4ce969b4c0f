//! Backend entry-point: loads configuration, prepares the store and serves
//! the inventory API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use key_inventory::inbound::http::health::HealthState;
use key_inventory::inbound::http::token_config::{BuildMode, TokenSecret, token_secret_from_env};
use key_inventory::outbound::persistence::{
    DbPool, DieselUserDirectory, PoolConfig, run_pending_migrations,
};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load configuration: {err}")))?;
    let token_secret = load_token_secret(BuildMode::from_debug_assertions())?;
    info!(fingerprint = %token_secret.fingerprint(), "token secret loaded");

    let mut config = ServerConfig::new(&settings, token_secret);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url, &settings).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

/// Read the signing secret named by the process environment.
fn load_token_secret(mode: BuildMode) -> std::io::Result<TokenSecret> {
    token_secret_from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)
}

/// Apply migrations, open the pool and make sure the spare holder row exists.
async fn prepare_database(
    database_url: &str,
    settings: &ServerSettings,
) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    web::block(move || run_pending_migrations(&url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(std::io::Error::other)?;

    DieselUserDirectory::new(pool.clone(), settings.reconciler())
        .ensure_spare_holder()
        .await
        .map_err(std::io::Error::other)?;
    info!(
        spare_user_id = settings.reconciler().spare_user_id(),
        "database ready"
    );
    Ok(pool)
}
