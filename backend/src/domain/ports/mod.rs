//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`KeyCatalogue`, `UserDirectory`, `AssignmentService`,
//! `InventoryOverview`, `CredentialVerifier`, `SessionTokens`) are called by
//! inbound adapters. `SpareLedger` is the driven port the reconciler writes
//! through.

mod macros;
pub(crate) use macros::define_port_error;

mod assignment_service;
mod credential_verifier;
mod inventory_overview;
mod key_catalogue;
mod session_tokens;
mod spare_ledger;
mod store_error;
mod user_directory;

pub use assignment_service::AssignmentService;
#[cfg(test)]
pub use assignment_service::MockAssignmentService;
pub use credential_verifier::{CredentialVerifier, StaticCredentialVerifier};
#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
pub use inventory_overview::InventoryOverview;
#[cfg(test)]
pub use inventory_overview::MockInventoryOverview;
pub use key_catalogue::KeyCatalogue;
#[cfg(test)]
pub use key_catalogue::MockKeyCatalogue;
#[cfg(test)]
pub use session_tokens::MockSessionTokens;
pub use session_tokens::SessionTokens;
pub use spare_ledger::SpareLedger;
pub use store_error::StoreError;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
