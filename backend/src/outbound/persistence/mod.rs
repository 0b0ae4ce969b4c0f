//! PostgreSQL persistence adapters using Diesel.
//!
//! - **Thin adapters**: stock rules live in the domain reconciler; adapters
//!   only open transactions and translate rows.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Pooling**: `bb8` over `diesel-async` connections.
//! - **Typed errors**: pool and Diesel failures become `StoreError`.
//!
//! # Example
//!
//! ```ignore
//! use key_inventory::domain::SpareReconciler;
//! use key_inventory::outbound::persistence::{DbPool, DieselKeyCatalogue, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/inventory")).await?;
//! let keys = DieselKeyCatalogue::new(pool, SpareReconciler::default());
//! ```

mod diesel_assignment_service;
pub(crate) mod diesel_helpers;
mod diesel_inventory_overview;
mod diesel_key_catalogue;
mod diesel_reads;
mod diesel_spare_ledger;
mod diesel_user_directory;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_assignment_service::DieselAssignmentService;
pub use diesel_inventory_overview::DieselInventoryOverview;
pub use diesel_key_catalogue::DieselKeyCatalogue;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
