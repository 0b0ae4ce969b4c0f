//! Driving port for the key catalogue.

use async_trait::async_trait;

use crate::domain::{Error, Key, KeyDraft, KeyId};

/// Key CRUD use-cases.
///
/// `update_key` and `delete_key` return `Ok(None)` when no key matched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyCatalogue: Send + Sync {
    async fn list_keys(&self) -> Result<Vec<Key>, Error>;

    /// Insert a key and seed its spare row with the full stock.
    async fn create_key(&self, draft: KeyDraft) -> Result<Key, Error>;

    /// Overwrite a key, moving the stock difference through its spare row.
    async fn update_key(&self, id: KeyId, draft: KeyDraft) -> Result<Option<Key>, Error>;

    /// Remove a key. Assignments referencing it are left in place.
    async fn delete_key(&self, id: KeyId) -> Result<Option<Key>, Error>;
}
