//! Server settings loaded via OrthoConfig and the runtime configuration
//! built from them.

use std::net::SocketAddr;

use key_inventory::domain::{DEFAULT_SPARE_USER_ID, SpareReconciler, UserId};
use key_inventory::inbound::http::token_config::TokenSecret;
use key_inventory::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "123456";

/// Settings read from `KEY_INVENTORY_*` variables, CLI flags and config
/// files.
///
/// Every field is optional; an empty source yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(prefix = "KEY_INVENTORY")]
pub struct ServerSettings {
    /// Listen address.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Bearer token lifetime in seconds.
    pub token_ttl_secs: Option<u64>,
    /// Operator login name.
    pub admin_username: Option<String>,
    /// Operator password.
    pub admin_password: Option<String>,
    /// Id of the reserved spare holder row.
    pub spare_user_id: Option<UserId>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        let secs = self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    pub fn admin_username(&self) -> &str {
        self.admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    pub fn admin_password(&self) -> &str {
        self.admin_password
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    pub fn reconciler(&self) -> SpareReconciler {
        SpareReconciler::new(self.spare_user_id.unwrap_or(DEFAULT_SPARE_USER_ID))
    }
}

/// Operator account accepted by `POST /login`.
#[derive(Clone)]
pub struct AdminCredentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// Everything `create_server` needs, resolved at startup.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) reconciler: SpareReconciler,
    pub(crate) token_secret: TokenSecret,
    pub(crate) token_ttl: chrono::Duration,
    pub(crate) admin: AdminCredentials,
}

impl ServerConfig {
    /// Construct a configuration from loaded settings and the token secret.
    #[must_use]
    pub fn new(settings: &ServerSettings, token_secret: TokenSecret) -> Self {
        Self {
            bind_addr: settings.bind_addr(),
            db_pool: None,
            reconciler: settings.reconciler(),
            token_secret,
            token_ttl: settings.token_ttl(),
            admin: AdminCredentials {
                username: settings.admin_username().to_owned(),
                password: settings.admin_password().to_owned(),
            },
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server falls back to the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
