//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL via Diesel.
//! - **memory**: in-process store with the same semantics.
//! - **token**: HS256 session tokens.
//!
//! Adapters translate between domain types and infrastructure; stock rules
//! stay in the domain reconciler.

pub mod memory;
pub mod persistence;
pub mod token;
