//! Assignments linking a holder to a quantity of one key.

use serde::Serialize;
use utoipa::ToSchema;

use super::{KeyId, UserId};

/// Store-assigned assignment identifier.
pub type AssignmentId = i32;

/// Validation errors returned by [`AssignmentDraft::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentValidationError {
    #[error("quantity must not be negative (got {quantity})")]
    NegativeQuantity { quantity: i32 },
}

/// Requested assignment before names are resolved.
///
/// # Examples
/// ```
/// use key_inventory::domain::AssignmentDraft;
///
/// let draft = AssignmentDraft::try_new(1, 2, 3).unwrap();
/// assert_eq!(draft.quantity(), 3);
/// assert!(AssignmentDraft::try_new(1, 2, -1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentDraft {
    user_id: UserId,
    key_id: KeyId,
    quantity: i32,
}

impl AssignmentDraft {
    pub fn try_new(
        user_id: UserId,
        key_id: KeyId,
        quantity: i32,
    ) -> Result<Self, AssignmentValidationError> {
        if quantity < 0 {
            return Err(AssignmentValidationError::NegativeQuantity { quantity });
        }
        Ok(Self {
            user_id,
            key_id,
            quantity,
        })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// Row to insert, with snapshot names already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub user_id: UserId,
    pub key_id: KeyId,
    pub quantity: i32,
    pub keyholder: String,
    pub keyname: String,
}

impl NewAssignment {
    pub fn into_assignment(self, id: AssignmentId) -> Assignment {
        Assignment {
            id,
            user_id: self.user_id,
            key_id: self.key_id,
            quantity: self.quantity,
            keyholder: self.keyholder,
            keyname: self.keyname,
        }
    }
}

/// A holding of `quantity` copies of key `key_id` by user `user_id`.
///
/// `keyholder` and `keyname` are snapshots taken when the row was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Assignment {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub key_id: KeyId,
    pub quantity: i32,
    pub keyholder: String,
    pub keyname: String,
}
