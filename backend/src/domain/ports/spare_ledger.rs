//! Transaction-scoped store handle used by the spare reconciler.
//!
//! Adapters open one transaction per reconciler operation and hand the
//! reconciler a `SpareLedger` bound to it. Every call made through the
//! ledger commits or rolls back together.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::{
    Assignment, AssignmentId, Key, KeyDraft, KeyId, NewAssignment, User, UserId,
};

/// Reads and writes available inside one store transaction.
#[async_trait]
pub trait SpareLedger: Send {
    async fn find_key(&mut self, id: KeyId) -> Result<Option<Key>, StoreError>;

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn find_assignment(&mut self, id: AssignmentId)
        -> Result<Option<Assignment>, StoreError>;

    /// Lowest-id assignment of `key_id` held by `user_id`.
    async fn find_holding(
        &mut self,
        user_id: UserId,
        key_id: KeyId,
    ) -> Result<Option<Assignment>, StoreError>;

    async fn insert_assignment(&mut self, row: NewAssignment) -> Result<Assignment, StoreError>;

    /// Replace every column of an existing row.
    async fn overwrite_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError>;

    async fn remove_assignment(&mut self, id: AssignmentId) -> Result<(), StoreError>;

    /// Add `delta` to the row's quantity and return the new value.
    async fn adjust_quantity(&mut self, id: AssignmentId, delta: i32) -> Result<i32, StoreError>;

    async fn insert_key(&mut self, draft: KeyDraft) -> Result<Key, StoreError>;

    async fn overwrite_key(&mut self, key: &Key) -> Result<(), StoreError>;
}
