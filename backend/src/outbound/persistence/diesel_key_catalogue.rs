//! PostgreSQL-backed `KeyCatalogue`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::info;

use crate::domain::ports::KeyCatalogue;
use crate::domain::{Error, Key, KeyDraft, KeyId, SpareReconciler};

use super::diesel_helpers::{TxError, map_diesel_error, map_pool_error};
use super::diesel_reads::load_keys;
use super::diesel_spare_ledger::DieselSpareLedger;
use super::models::KeyRow;
use super::pool::DbPool;
use super::schema::keys;

/// Key catalogue whose writes share a transaction with the spare row.
#[derive(Clone)]
pub struct DieselKeyCatalogue {
    pool: DbPool,
    reconciler: SpareReconciler,
}

impl DieselKeyCatalogue {
    pub fn new(pool: DbPool, reconciler: SpareReconciler) -> Self {
        Self { pool, reconciler }
    }
}

#[async_trait]
impl KeyCatalogue for DieselKeyCatalogue {
    async fn list_keys(&self) -> Result<Vec<Key>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let keys = load_keys(&mut pooled)
            .await
            .map_err(|err| map_diesel_error(err, "list keys"))?;
        Ok(keys)
    }

    async fn create_key(&self, draft: KeyDraft) -> Result<Key, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let reconciler = self.reconciler;
        let key = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut ledger = DieselSpareLedger::new(conn);
                    Ok(reconciler.on_key_create(&mut ledger, draft).await?)
                }
                .scope_boxed()
            })
            .await?;
        info!(key_id = key.id, total = key.total_no_of_key, "key created");
        Ok(key)
    }

    async fn update_key(&self, id: KeyId, draft: KeyDraft) -> Result<Option<Key>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let reconciler = self.reconciler;
        let key = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut ledger = DieselSpareLedger::new(conn);
                    Ok(reconciler.on_key_update(&mut ledger, id, draft).await?)
                }
                .scope_boxed()
            })
            .await?;
        Ok(key)
    }

    async fn delete_key(&self, id: KeyId) -> Result<Option<Key>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::delete(keys::table.find(id))
            .returning(KeyRow::as_returning())
            .get_result(&mut pooled)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "delete key"))?;
        Ok(row.map(Key::from))
    }
}
