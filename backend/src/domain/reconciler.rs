//! Spare-inventory reconciliation.
//!
//! A reserved holder (the spare user) owns one assignment row per key whose
//! quantity is the stock nobody holds. Every write that moves stock between
//! holders goes through [`SpareReconciler`] so that, for each key,
//!
//! ```text
//! sum(assign_key.quantity where key_id = K) == keys.total_no_of_key of K
//! ```
//!
//! The reconciler never opens transactions itself. Callers run each
//! operation against a [`SpareLedger`] bound to one store transaction and
//! roll back when it returns an error.

use serde_json::json;
use tracing::debug;

use super::ports::{SpareLedger, StoreError};
use super::{
    Assignment, AssignmentDraft, AssignmentId, Error, Key, KeyDraft, KeyId, NewAssignment, User,
    UserId,
};

/// Holder id reserved for spare stock unless configured otherwise.
pub const DEFAULT_SPARE_USER_ID: UserId = 87;
/// Name of the reserved holder.
pub const SPARE_HOLDER_NAME: &str = "Spare";
/// Key name written on spare rows created lazily for an existing key.
pub const SPARE_KEY_NAME: &str = "Spare Key";

/// Reasons a reconciler operation was refused or failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Insufficient spare key quantity")]
    InsufficientStock {
        key_id: KeyId,
        available: i32,
        requested: i32,
    },
    #[error("User not found")]
    UserNotFound { user_id: UserId },
    #[error("Key not found")]
    KeyNotFound { key_id: KeyId },
    #[error("Record not found")]
    AssignmentNotFound { id: AssignmentId },
    #[error("Spare holder stock is managed automatically")]
    ReservedHolder,
}

impl From<ReconcileError> for Error {
    fn from(value: ReconcileError) -> Self {
        let message = value.to_string();
        match value {
            ReconcileError::Store(err) => err.into(),
            ReconcileError::InsufficientStock {
                key_id,
                available,
                requested,
            } => Error::invalid_request(message).with_details(json!({
                "key_id": key_id,
                "available": available,
                "requested": requested,
            })),
            ReconcileError::UserNotFound { user_id } => {
                Error::invalid_request(message).with_details(json!({ "user_id": user_id }))
            }
            ReconcileError::KeyNotFound { key_id } => {
                Error::invalid_request(message).with_details(json!({ "key_id": key_id }))
            }
            ReconcileError::AssignmentNotFound { .. } => Error::not_found(message),
            ReconcileError::ReservedHolder => Error::invalid_request(message),
        }
    }
}

/// Stock bookkeeping for assignments and key totals.
///
/// # Examples
/// ```
/// use key_inventory::domain::SpareReconciler;
///
/// let reconciler = SpareReconciler::default();
/// assert!(reconciler.is_spare_holder(87));
/// assert!(!SpareReconciler::new(5).is_spare_holder(87));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpareReconciler {
    spare_user_id: UserId,
}

impl Default for SpareReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_SPARE_USER_ID)
    }
}

impl SpareReconciler {
    pub const fn new(spare_user_id: UserId) -> Self {
        Self { spare_user_id }
    }

    pub fn spare_user_id(&self) -> UserId {
        self.spare_user_id
    }

    pub fn is_spare_holder(&self, user_id: UserId) -> bool {
        user_id == self.spare_user_id
    }

    /// Refuse operations that would touch the spare holder directly.
    pub fn guard_holder(&self, user_id: UserId) -> Result<(), ReconcileError> {
        if self.is_spare_holder(user_id) {
            Err(ReconcileError::ReservedHolder)
        } else {
            Ok(())
        }
    }

    /// Return the spare row for `key_id`, creating it at quantity zero when
    /// absent.
    pub async fn ensure_spare_row<L>(
        &self,
        ledger: &mut L,
        key_id: KeyId,
    ) -> Result<Assignment, ReconcileError>
    where
        L: SpareLedger + ?Sized,
    {
        if let Some(row) = ledger.find_holding(self.spare_user_id, key_id).await? {
            return Ok(row);
        }
        debug!(key_id, "creating empty spare row");
        let row = ledger
            .insert_assignment(NewAssignment {
                user_id: self.spare_user_id,
                key_id,
                quantity: 0,
                keyholder: SPARE_HOLDER_NAME.to_owned(),
                keyname: SPARE_KEY_NAME.to_owned(),
            })
            .await?;
        Ok(row)
    }

    /// Insert a key and put its whole stock on the spare row.
    pub async fn on_key_create<L>(&self, ledger: &mut L, draft: KeyDraft) -> Result<Key, ReconcileError>
    where
        L: SpareLedger + ?Sized,
    {
        let key = ledger.insert_key(draft).await?;
        match ledger.find_holding(self.spare_user_id, key.id).await? {
            Some(spare) => {
                ledger.adjust_quantity(spare.id, key.total_no_of_key).await?;
            }
            None => {
                ledger
                    .insert_assignment(NewAssignment {
                        user_id: self.spare_user_id,
                        key_id: key.id,
                        quantity: key.total_no_of_key,
                        keyholder: SPARE_HOLDER_NAME.to_owned(),
                        keyname: key.keyname.clone(),
                    })
                    .await?;
            }
        }
        Ok(key)
    }

    /// Overwrite a key, moving the change in total through its spare row.
    ///
    /// Returns `Ok(None)` when the key does not exist. Assignment snapshots
    /// keep the name they were written with.
    pub async fn on_key_update<L>(
        &self,
        ledger: &mut L,
        id: KeyId,
        draft: KeyDraft,
    ) -> Result<Option<Key>, ReconcileError>
    where
        L: SpareLedger + ?Sized,
    {
        let Some(existing) = ledger.find_key(id).await? else {
            return Ok(None);
        };
        let updated = draft.into_key(id);
        let delta = updated.total_no_of_key - existing.total_no_of_key;
        let spare = self.ensure_spare_row(ledger, id).await?;
        if spare.quantity + delta < 0 {
            return Err(ReconcileError::InsufficientStock {
                key_id: id,
                available: spare.quantity,
                requested: -delta,
            });
        }
        if delta != 0 {
            ledger.adjust_quantity(spare.id, delta).await?;
        }
        ledger.overwrite_key(&updated).await?;
        Ok(Some(updated))
    }

    /// Assign stock from the spare row to a holder.
    pub async fn on_assignment_create<L>(
        &self,
        ledger: &mut L,
        draft: AssignmentDraft,
    ) -> Result<Assignment, ReconcileError>
    where
        L: SpareLedger + ?Sized,
    {
        self.guard_holder(draft.user_id())?;
        let spare = self.ensure_spare_row(ledger, draft.key_id()).await?;
        check_stock(draft.key_id(), spare.quantity, draft.quantity())?;

        let (user, key) = resolve_names(ledger, draft).await?;
        let created = ledger
            .insert_assignment(NewAssignment {
                user_id: user.id,
                key_id: key.id,
                quantity: draft.quantity(),
                keyholder: user.name,
                keyname: key.keyname,
            })
            .await?;
        ledger.adjust_quantity(spare.id, -draft.quantity()).await?;
        Ok(created)
    }

    /// Change holder, key or quantity of an assignment.
    ///
    /// Same key: the spare row absorbs the quantity difference. New key: the
    /// old key's spare row gets the old quantity back and the new key's
    /// spare row pays the new quantity.
    pub async fn on_assignment_update<L>(
        &self,
        ledger: &mut L,
        id: AssignmentId,
        draft: AssignmentDraft,
    ) -> Result<Assignment, ReconcileError>
    where
        L: SpareLedger + ?Sized,
    {
        self.guard_holder(draft.user_id())?;
        let spare = self.ensure_spare_row(ledger, draft.key_id()).await?;
        let existing = ledger
            .find_assignment(id)
            .await?
            .ok_or(ReconcileError::AssignmentNotFound { id })?;
        self.guard_holder(existing.user_id)?;

        if existing.key_id == draft.key_id() {
            check_stock(
                draft.key_id(),
                spare.quantity + existing.quantity,
                draft.quantity(),
            )?;
            let delta = existing.quantity - draft.quantity();
            if delta != 0 {
                ledger.adjust_quantity(spare.id, delta).await?;
            }
        } else {
            check_stock(draft.key_id(), spare.quantity, draft.quantity())?;
            let previous = self.ensure_spare_row(ledger, existing.key_id).await?;
            ledger.adjust_quantity(previous.id, existing.quantity).await?;
            ledger.adjust_quantity(spare.id, -draft.quantity()).await?;
        }

        let (user, key) = resolve_names(ledger, draft).await?;
        let updated = Assignment {
            id,
            user_id: user.id,
            key_id: key.id,
            quantity: draft.quantity(),
            keyholder: user.name,
            keyname: key.keyname,
        };
        ledger.overwrite_assignment(&updated).await?;
        Ok(updated)
    }

    /// Remove an assignment and return its stock to the spare row.
    pub async fn on_assignment_delete<L>(
        &self,
        ledger: &mut L,
        id: AssignmentId,
    ) -> Result<Assignment, ReconcileError>
    where
        L: SpareLedger + ?Sized,
    {
        let existing = ledger
            .find_assignment(id)
            .await?
            .ok_or(ReconcileError::AssignmentNotFound { id })?;
        self.guard_holder(existing.user_id)?;
        let spare = self.ensure_spare_row(ledger, existing.key_id).await?;
        ledger.remove_assignment(id).await?;
        ledger.adjust_quantity(spare.id, existing.quantity).await?;
        Ok(existing)
    }
}

fn check_stock(key_id: KeyId, available: i32, requested: i32) -> Result<(), ReconcileError> {
    if available < requested {
        debug!(key_id, available, requested, "insufficient spare stock");
        return Err(ReconcileError::InsufficientStock {
            key_id,
            available,
            requested,
        });
    }
    Ok(())
}

async fn resolve_names<L>(ledger: &mut L, draft: AssignmentDraft) -> Result<(User, Key), ReconcileError>
where
    L: SpareLedger + ?Sized,
{
    let user = ledger
        .find_user(draft.user_id())
        .await?
        .ok_or(ReconcileError::UserNotFound {
            user_id: draft.user_id(),
        })?;
    let key = ledger
        .find_key(draft.key_id())
        .await?
        .ok_or(ReconcileError::KeyNotFound {
            key_id: draft.key_id(),
        })?;
    Ok((user, key))
}

#[cfg(test)]
mod tests;
