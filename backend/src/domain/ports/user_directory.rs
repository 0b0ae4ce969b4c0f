//! Driving port for key holders.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId};

/// User CRUD use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<Option<User>, Error>;

    /// Remove a user; the spare holder is refused.
    async fn delete_user(&self, id: UserId) -> Result<Option<User>, Error>;
}
