//! Read queries shared by the list endpoints, the aggregate view and the
//! export, so every caller sees identical rows.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{Assignment, InventoryExport, Key, OverviewRow, User};

use super::models::{AssignmentRow, KeyRow, UserRow};
use super::schema::{assign_key, keys, users};

pub(crate) async fn load_keys(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Key>> {
    let rows: Vec<KeyRow> = keys::table
        .select(KeyRow::as_select())
        .order_by(keys::id.asc())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(Key::from).collect())
}

pub(crate) async fn load_users(conn: &mut AsyncPgConnection) -> QueryResult<Vec<User>> {
    let rows: Vec<UserRow> = users::table
        .select(UserRow::as_select())
        .order_by(users::id.asc())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(User::from).collect())
}

/// Assignments with live holder and key names, falling back to the stored
/// snapshot when the referenced row is gone.
pub(crate) async fn load_assignments(conn: &mut AsyncPgConnection) -> QueryResult<Vec<Assignment>> {
    let rows: Vec<(AssignmentRow, Option<String>, Option<String>)> = assign_key::table
        .left_join(users::table.on(users::id.eq(assign_key::user_id)))
        .left_join(keys::table.on(keys::id.eq(assign_key::key_id)))
        .select((
            AssignmentRow::as_select(),
            users::name.nullable(),
            keys::keyname.nullable(),
        ))
        .order_by(assign_key::id.asc())
        .load(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(row, holder, keyname)| {
            let mut assignment = Assignment::from(row);
            if let Some(holder) = holder {
                assignment.keyholder = holder;
            }
            if let Some(keyname) = keyname {
                assignment.keyname = keyname;
            }
            assignment
        })
        .collect())
}

type OverviewTuple = (
    KeyRow,
    Option<i32>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// `keys LEFT JOIN assign_key LEFT JOIN users`, ordered by key id then
/// holder name. PostgreSQL sorts nulls last for ascending order.
pub(crate) async fn load_overview(conn: &mut AsyncPgConnection) -> QueryResult<Vec<OverviewRow>> {
    let rows: Vec<OverviewTuple> = keys::table
        .left_join(assign_key::table.on(assign_key::key_id.eq(keys::id)))
        .left_join(users::table.on(users::id.eq(assign_key::user_id)))
        .select((
            KeyRow::as_select(),
            assign_key::quantity.nullable(),
            users::name.nullable(),
            users::division.nullable(),
            users::ministry.nullable(),
        ))
        .order_by((
            keys::id.asc(),
            holder_order().asc(),
            assign_key::id.nullable().asc(),
        ))
        .load(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(key, quantity, keyholder, division, ministry)| OverviewRow {
            id: key.id,
            key_type: key.key_type,
            zone: key.zone,
            usage: key.usage,
            keyname: key.keyname,
            keydescription: key.keydescription,
            keytag: key.keytag,
            total_no_of_key: key.total_no_of_key,
            quantity: quantity.unwrap_or(0),
            keyholder,
            division,
            ministry,
        })
        .collect())
}

/// Holder names compare bytewise so the order does not follow the
/// database locale and matches the in-memory store.
fn holder_order() -> SqlLiteral<Nullable<Text>> {
    sql::<Nullable<Text>>(r#"users.name COLLATE "C""#)
}

/// All four collections; callers run this inside one transaction.
pub(crate) async fn load_export(conn: &mut AsyncPgConnection) -> QueryResult<InventoryExport> {
    Ok(InventoryExport {
        keys: load_keys(conn).await?,
        users: load_users(conn).await?,
        assignments: load_assignments(conn).await?,
        overall: load_overview(conn).await?,
    })
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn holder_names_sort_bytewise() {
        let sql = debug_query::<Pg, _>(&holder_order().asc()).to_string();
        assert!(sql.starts_with(r#"users.name COLLATE "C" ASC"#), "{sql}");
    }
}
