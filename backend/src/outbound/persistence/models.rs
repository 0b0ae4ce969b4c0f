//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; adapters convert them to domain
//! types at the boundary.

use diesel::prelude::*;

use crate::domain::{Assignment, Key, KeyDraft, NewAssignment, User, UserDraft};

use super::schema::{assign_key, keys, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = keys)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct KeyRow {
    pub id: i32,
    pub key_type: String,
    pub zone: String,
    pub usage: String,
    pub keyname: String,
    pub keydescription: String,
    pub keytag: String,
    pub total_no_of_key: i32,
}

impl From<KeyRow> for Key {
    fn from(row: KeyRow) -> Self {
        Self {
            id: row.id,
            key_type: row.key_type,
            zone: row.zone,
            usage: row.usage,
            keyname: row.keyname,
            keydescription: row.keydescription,
            keytag: row.keytag,
            total_no_of_key: row.total_no_of_key,
        }
    }
}

/// Insert and update payload for `keys`.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = keys)]
pub(crate) struct KeyValues<'a> {
    pub key_type: &'a str,
    pub zone: &'a str,
    pub usage: &'a str,
    pub keyname: &'a str,
    pub keydescription: &'a str,
    pub keytag: &'a str,
    pub total_no_of_key: i32,
}

impl<'a> From<&'a KeyDraft> for KeyValues<'a> {
    fn from(draft: &'a KeyDraft) -> Self {
        Self {
            key_type: draft.key_type(),
            zone: draft.zone(),
            usage: draft.usage(),
            keyname: draft.keyname(),
            keydescription: draft.keydescription(),
            keytag: draft.keytag(),
            total_no_of_key: draft.total_no_of_key(),
        }
    }
}

impl<'a> From<&'a Key> for KeyValues<'a> {
    fn from(key: &'a Key) -> Self {
        Self {
            key_type: &key.key_type,
            zone: &key.zone,
            usage: &key.usage,
            keyname: &key.keyname,
            keydescription: &key.keydescription,
            keytag: &key.keytag,
            total_no_of_key: key.total_no_of_key,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub division: String,
    pub ministry: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            division: row.division,
            ministry: row.ministry,
        }
    }
}

/// Insert and update payload for `users`.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserValues<'a> {
    pub name: &'a str,
    pub division: &'a str,
    pub ministry: &'a str,
}

impl<'a> From<&'a UserDraft> for UserValues<'a> {
    fn from(draft: &'a UserDraft) -> Self {
        Self {
            name: draft.name(),
            division: draft.division(),
            ministry: draft.ministry(),
        }
    }
}

/// Spare holder row written at startup with an explicit id.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct SpareHolderRow<'a> {
    pub id: i32,
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assign_key)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssignmentRow {
    pub id: i32,
    pub user_id: i32,
    pub key_id: i32,
    pub quantity: i32,
    pub keyholder: String,
    pub keyname: String,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            key_id: row.key_id,
            quantity: row.quantity,
            keyholder: row.keyholder,
            keyname: row.keyname,
        }
    }
}

/// Insert and update payload for `assign_key`.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = assign_key)]
pub(crate) struct AssignmentValues<'a> {
    pub user_id: i32,
    pub key_id: i32,
    pub quantity: i32,
    pub keyholder: &'a str,
    pub keyname: &'a str,
}

impl<'a> From<&'a NewAssignment> for AssignmentValues<'a> {
    fn from(row: &'a NewAssignment) -> Self {
        Self {
            user_id: row.user_id,
            key_id: row.key_id,
            quantity: row.quantity,
            keyholder: &row.keyholder,
            keyname: &row.keyname,
        }
    }
}

impl<'a> From<&'a Assignment> for AssignmentValues<'a> {
    fn from(row: &'a Assignment) -> Self {
        Self {
            user_id: row.user_id,
            key_id: row.key_id,
            quantity: row.quantity,
            keyholder: &row.keyholder,
            keyname: &row.keyname,
        }
    }
}
