//! PostgreSQL-backed `AssignmentService`.
//!
//! Each write opens one transaction and runs the matching reconciler
//! operation inside it; any error rolls the whole operation back.

use async_trait::async_trait;
use diesel_async::AsyncPgConnection;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::info;

use crate::domain::ports::AssignmentService;
use crate::domain::{Assignment, AssignmentDraft, AssignmentId, Error, SpareReconciler};

use super::diesel_helpers::{TxError, map_diesel_error, map_pool_error};
use super::diesel_reads::load_assignments;
use super::diesel_spare_ledger::DieselSpareLedger;
use super::pool::DbPool;

#[derive(Clone)]
pub struct DieselAssignmentService {
    pool: DbPool,
    reconciler: SpareReconciler,
}

impl DieselAssignmentService {
    pub fn new(pool: DbPool, reconciler: SpareReconciler) -> Self {
        Self { pool, reconciler }
    }
}

#[async_trait]
impl AssignmentService for DieselAssignmentService {
    async fn list_assignments(&self) -> Result<Vec<Assignment>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let rows = load_assignments(&mut pooled)
            .await
            .map_err(|err| map_diesel_error(err, "list assignments"))?;
        Ok(rows)
    }

    async fn create_assignment(&self, draft: AssignmentDraft) -> Result<Assignment, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let reconciler = self.reconciler;
        let created = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut ledger = DieselSpareLedger::new(conn);
                    Ok(reconciler.on_assignment_create(&mut ledger, draft).await?)
                }
                .scope_boxed()
            })
            .await?;
        info!(
            assignment_id = created.id,
            key_id = created.key_id,
            quantity = created.quantity,
            "assignment created"
        );
        Ok(created)
    }

    async fn update_assignment(
        &self,
        id: AssignmentId,
        draft: AssignmentDraft,
    ) -> Result<Assignment, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let reconciler = self.reconciler;
        let updated = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut ledger = DieselSpareLedger::new(conn);
                    Ok(reconciler.on_assignment_update(&mut ledger, id, draft).await?)
                }
                .scope_boxed()
            })
            .await?;
        Ok(updated)
    }

    async fn delete_assignment(&self, id: AssignmentId) -> Result<Assignment, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        let reconciler = self.reconciler;
        let deleted = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let mut ledger = DieselSpareLedger::new(conn);
                    Ok(reconciler.on_assignment_delete(&mut ledger, id).await?)
                }
                .scope_boxed()
            })
            .await?;
        info!(assignment_id = id, "assignment deleted");
        Ok(deleted)
    }
}
