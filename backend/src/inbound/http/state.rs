//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AssignmentService, CredentialVerifier, InventoryOverview, KeyCatalogue, SessionTokens,
    UserDirectory,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub keys: Arc<dyn KeyCatalogue>,
    pub users: Arc<dyn UserDirectory>,
    pub assignments: Arc<dyn AssignmentService>,
    pub overview: Arc<dyn InventoryOverview>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub tokens: Arc<dyn SessionTokens>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub keys: Arc<dyn KeyCatalogue>,
    pub users: Arc<dyn UserDirectory>,
    pub assignments: Arc<dyn AssignmentService>,
    pub overview: Arc<dyn InventoryOverview>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub tokens: Arc<dyn SessionTokens>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use key_inventory::domain::SpareReconciler;
    /// use key_inventory::domain::ports::StaticCredentialVerifier;
    /// use key_inventory::inbound::http::state::{HttpState, HttpStatePorts};
    /// use key_inventory::outbound::memory::MemoryInventory;
    /// use key_inventory::outbound::token::JwtTokenAuthority;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(MemoryInventory::new(SpareReconciler::default()));
    /// let state = HttpState::new(HttpStatePorts {
    ///     keys: store.clone(),
    ///     users: store.clone(),
    ///     assignments: store.clone(),
    ///     overview: store,
    ///     credentials: Arc::new(StaticCredentialVerifier::new("admin", "123456")),
    ///     tokens: Arc::new(JwtTokenAuthority::new(
    ///         b"an example secret of adequate length",
    ///         chrono::Duration::hours(1),
    ///         Arc::new(DefaultClock),
    ///     )),
    /// });
    /// let _keys = state.keys.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            keys,
            users,
            assignments,
            overview,
            credentials,
            tokens,
        } = ports;
        Self {
            keys,
            users,
            assignments,
            overview,
            credentials,
            tokens,
        }
    }
}
