//! PostgreSQL-backed `UserDirectory`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::info;

use crate::domain::ports::{StoreError, UserDirectory};
use crate::domain::{Error, SPARE_HOLDER_NAME, SpareReconciler, User, UserDraft, UserId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::diesel_reads::load_users;
use super::models::{SpareHolderRow, UserRow, UserValues};
use super::pool::DbPool;
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
    reconciler: SpareReconciler,
}

impl DieselUserDirectory {
    pub fn new(pool: DbPool, reconciler: SpareReconciler) -> Self {
        Self { pool, reconciler }
    }

    /// Insert the spare holder if missing and move the id sequence past it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the database rejects either statement.
    pub async fn ensure_spare_holder(&self) -> Result<(), StoreError> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(users::table)
            .values(SpareHolderRow {
                id: self.reconciler.spare_user_id(),
                name: SPARE_HOLDER_NAME,
            })
            .on_conflict(users::id)
            .do_nothing()
            .execute(&mut pooled)
            .await
            .map_err(|err| map_diesel_error(err, "insert spare holder"))?;
        diesel::sql_query(
            "SELECT setval(pg_get_serial_sequence('users', 'id'), \
             GREATEST((SELECT MAX(id) FROM users), 1))",
        )
        .execute(&mut pooled)
        .await
        .map_err(|err| map_diesel_error(err, "advance users sequence"))?;
        if inserted > 0 {
            info!(
                user_id = self.reconciler.spare_user_id(),
                "created spare holder"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let users = load_users(&mut pooled)
            .await
            .map_err(|err| map_diesel_error(err, "list users"))?;
        Ok(users)
    }

    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(users::table)
            .values(UserValues::from(&draft))
            .returning(UserRow::as_returning())
            .get_result(&mut pooled)
            .await
            .map_err(|err| map_diesel_error(err, "insert user"))?;
        Ok(row.into())
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<Option<User>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.find(id))
            .set(UserValues::from(&draft))
            .returning(UserRow::as_returning())
            .get_result(&mut pooled)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "update user"))?;
        Ok(row.map(User::from))
    }

    async fn delete_user(&self, id: UserId) -> Result<Option<User>, Error> {
        self.reconciler.guard_holder(id)?;
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::delete(users::table.find(id))
            .returning(UserRow::as_returning())
            .get_result(&mut pooled)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "delete user"))?;
        Ok(row.map(User::from))
    }
}
