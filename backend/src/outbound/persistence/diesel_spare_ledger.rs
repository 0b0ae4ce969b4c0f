//! `SpareLedger` bound to one open PostgreSQL transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{SpareLedger, StoreError};
use crate::domain::{
    Assignment, AssignmentId, Key, KeyDraft, KeyId, NewAssignment, User, UserId,
};

use super::diesel_helpers::map_diesel_error;
use super::models::{AssignmentRow, AssignmentValues, KeyRow, KeyValues, UserRow};
use super::schema::{assign_key, keys, users};

/// Ledger over a connection that is already inside a transaction.
///
/// The adapter that opened the transaction decides whether it commits.
pub(crate) struct DieselSpareLedger<'c> {
    conn: &'c mut AsyncPgConnection,
}

impl<'c> DieselSpareLedger<'c> {
    pub(crate) fn new(conn: &'c mut AsyncPgConnection) -> Self {
        Self { conn }
    }
}

/// Rows read before a quantity check stay locked until the transaction ends.
#[diesel::dsl::auto_type(no_type_alias)]
fn locked_assignment(id: AssignmentId) -> _ {
    assign_key::table.find(id).for_update()
}

#[diesel::dsl::auto_type(no_type_alias)]
fn locked_holding(user_id: UserId, key_id: KeyId) -> _ {
    assign_key::table
        .filter(assign_key::user_id.eq(user_id))
        .filter(assign_key::key_id.eq(key_id))
        .order_by(assign_key::id.asc())
        .for_update()
}

#[async_trait]
impl SpareLedger for DieselSpareLedger<'_> {
    async fn find_key(&mut self, id: KeyId) -> Result<Option<Key>, StoreError> {
        keys::table
            .find(id)
            .select(KeyRow::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map(|row| row.map(Key::from))
            .map_err(|err| map_diesel_error(err, "find key"))
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map(|row| row.map(User::from))
            .map_err(|err| map_diesel_error(err, "find user"))
    }

    async fn find_assignment(
        &mut self,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, StoreError> {
        locked_assignment(id)
            .select(AssignmentRow::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map(|row| row.map(Assignment::from))
            .map_err(|err| map_diesel_error(err, "find assignment"))
    }

    async fn find_holding(
        &mut self,
        user_id: UserId,
        key_id: KeyId,
    ) -> Result<Option<Assignment>, StoreError> {
        locked_holding(user_id, key_id)
            .select(AssignmentRow::as_select())
            .first(&mut *self.conn)
            .await
            .optional()
            .map(|row| row.map(Assignment::from))
            .map_err(|err| map_diesel_error(err, "find holding"))
    }

    async fn insert_assignment(&mut self, row: NewAssignment) -> Result<Assignment, StoreError> {
        diesel::insert_into(assign_key::table)
            .values(AssignmentValues::from(&row))
            .returning(AssignmentRow::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map(Assignment::from)
            .map_err(|err| map_diesel_error(err, "insert assignment"))
    }

    async fn overwrite_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError> {
        diesel::update(assign_key::table.find(assignment.id))
            .set(AssignmentValues::from(assignment))
            .execute(&mut *self.conn)
            .await
            .map(drop)
            .map_err(|err| map_diesel_error(err, "update assignment"))
    }

    async fn remove_assignment(&mut self, id: AssignmentId) -> Result<(), StoreError> {
        diesel::delete(assign_key::table.find(id))
            .execute(&mut *self.conn)
            .await
            .map(drop)
            .map_err(|err| map_diesel_error(err, "delete assignment"))
    }

    async fn adjust_quantity(&mut self, id: AssignmentId, delta: i32) -> Result<i32, StoreError> {
        diesel::update(assign_key::table.find(id))
            .set(assign_key::quantity.eq(assign_key::quantity + delta))
            .returning(assign_key::quantity)
            .get_result(&mut *self.conn)
            .await
            .map_err(|err| map_diesel_error(err, "adjust quantity"))
    }

    async fn insert_key(&mut self, draft: KeyDraft) -> Result<Key, StoreError> {
        diesel::insert_into(keys::table)
            .values(KeyValues::from(&draft))
            .returning(KeyRow::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map(Key::from)
            .map_err(|err| map_diesel_error(err, "insert key"))
    }

    async fn overwrite_key(&mut self, key: &Key) -> Result<(), StoreError> {
        diesel::update(keys::table.find(key.id))
            .set(KeyValues::from(key))
            .execute(&mut *self.conn)
            .await
            .map(drop)
            .map_err(|err| map_diesel_error(err, "update key"))
    }
}
