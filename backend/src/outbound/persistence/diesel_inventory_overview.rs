//! PostgreSQL-backed `InventoryOverview`.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection};

use crate::domain::ports::InventoryOverview;
use crate::domain::{Error, InventoryExport, OverviewRow};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::diesel_reads::{load_export, load_overview};
use super::pool::DbPool;

#[derive(Clone)]
pub struct DieselInventoryOverview {
    pool: DbPool,
}

impl DieselInventoryOverview {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryOverview for DieselInventoryOverview {
    async fn overview(&self) -> Result<Vec<OverviewRow>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let rows = load_overview(&mut pooled)
            .await
            .map_err(|err| map_diesel_error(err, "aggregate view"))?;
        Ok(rows)
    }

    async fn export(&self) -> Result<InventoryExport, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut AsyncPgConnection = &mut pooled;
        // One transaction so the four collections come from one snapshot.
        let export = conn
            .transaction::<_, diesel::result::Error, _>(|conn| async move { load_export(conn).await }.scope_boxed())
            .await
            .map_err(|err| map_diesel_error(err, "export"))?;
        Ok(export)
    }
}
