//! Builders for the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use key_inventory::domain::SpareReconciler;
use key_inventory::domain::ports::{
    AssignmentService, InventoryOverview, KeyCatalogue, StaticCredentialVerifier, UserDirectory,
};
use key_inventory::inbound::http::state::{HttpState, HttpStatePorts};
use key_inventory::outbound::memory::MemoryInventory;
use key_inventory::outbound::persistence::{
    DbPool, DieselAssignmentService, DieselInventoryOverview, DieselKeyCatalogue,
    DieselUserDirectory,
};
use key_inventory::outbound::token::JwtTokenAuthority;

use super::ServerConfig;

/// The four inventory ports, backed by one store.
struct StorePorts {
    keys: Arc<dyn KeyCatalogue>,
    users: Arc<dyn UserDirectory>,
    assignments: Arc<dyn AssignmentService>,
    overview: Arc<dyn InventoryOverview>,
}

fn diesel_ports(pool: &DbPool, reconciler: SpareReconciler) -> StorePorts {
    StorePorts {
        keys: Arc::new(DieselKeyCatalogue::new(pool.clone(), reconciler)),
        users: Arc::new(DieselUserDirectory::new(pool.clone(), reconciler)),
        assignments: Arc::new(DieselAssignmentService::new(pool.clone(), reconciler)),
        overview: Arc::new(DieselInventoryOverview::new(pool.clone())),
    }
}

fn memory_ports(reconciler: SpareReconciler) -> StorePorts {
    warn!("no database configured; inventory is held in memory and lost on exit");
    let store = Arc::new(MemoryInventory::new(reconciler));
    StorePorts {
        keys: store.clone(),
        users: store.clone(),
        assignments: store.clone(),
        overview: store,
    }
}

/// Build handler state, choosing PostgreSQL adapters when a pool is
/// configured and the in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let StorePorts {
        keys,
        users,
        assignments,
        overview,
    } = match &config.db_pool {
        Some(pool) => diesel_ports(pool, config.reconciler),
        None => memory_ports(config.reconciler),
    };

    web::Data::new(HttpState::new(HttpStatePorts {
        keys,
        users,
        assignments,
        overview,
        credentials: Arc::new(StaticCredentialVerifier::new(
            config.admin.username.clone(),
            config.admin.password.clone(),
        )),
        tokens: Arc::new(JwtTokenAuthority::new(
            config.token_secret.as_bytes(),
            config.token_ttl,
            Arc::new(DefaultClock),
        )),
    }))
}
