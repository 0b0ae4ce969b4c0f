//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly; `diesel print-schema`
//! regenerates them from a live database.

diesel::table! {
    /// Key catalogue. `total_no_of_key` is the authoritative stock count.
    keys (id) {
        id -> Int4,
        #[sql_name = "type"]
        key_type -> Text,
        zone -> Text,
        usage -> Text,
        keyname -> Text,
        keydescription -> Text,
        keytag -> Text,
        total_no_of_key -> Int4,
    }
}

diesel::table! {
    /// Key holders, including the reserved spare holder.
    users (id) {
        id -> Int4,
        name -> Text,
        division -> Text,
        ministry -> Text,
    }
}

diesel::table! {
    /// Holdings. `keyholder` and `keyname` are snapshots taken on write.
    assign_key (id) {
        id -> Int4,
        user_id -> Int4,
        key_id -> Int4,
        quantity -> Int4,
        keyholder -> Text,
        keyname -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(keys, users, assign_key);
