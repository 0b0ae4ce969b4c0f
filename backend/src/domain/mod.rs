//! Domain primitives, the spare reconciler and the port traits.
//!
//! Public surface:
//! - `Key`, `User`, `Assignment` and their validated drafts.
//! - `OverviewRow` and `InventoryExport` read models.
//! - `SpareReconciler`, which keeps spare stock consistent.
//! - `Error` / `ErrorCode`, the transport-agnostic failure payload.
//! - `TraceId`, the request correlation identifier.

pub mod assignment;
pub mod auth;
pub mod error;
pub mod key;
pub mod overview;
pub mod ports;
pub mod reconciler;
pub mod trace_id;
pub mod user;

pub use self::assignment::{
    Assignment, AssignmentDraft, AssignmentId, AssignmentValidationError, NewAssignment,
};
pub use self::auth::{LoginCredentials, LoginValidationError, Principal, SessionToken};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::key::{Key, KeyDraft, KeyDraftParts, KeyId, KeyValidationError};
pub use self::overview::{InventoryExport, OverviewRow};
pub use self::reconciler::{
    DEFAULT_SPARE_USER_ID, ReconcileError, SPARE_HOLDER_NAME, SPARE_KEY_NAME, SpareReconciler,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserDraft, UserId, UserValidationError};
