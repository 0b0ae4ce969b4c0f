//! Read models for the aggregate view and the bulk export.

use std::cmp::Ordering;

use serde::Serialize;
use utoipa::ToSchema;

use super::{Assignment, Key, KeyId, User};

/// One key with one of its holders.
///
/// Keys without assignments appear once with `quantity` zero and the holder
/// columns null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OverviewRow {
    pub id: KeyId,
    #[serde(rename = "type")]
    pub key_type: String,
    pub zone: String,
    pub usage: String,
    pub keyname: String,
    pub keydescription: String,
    pub keytag: String,
    pub total_no_of_key: i32,
    pub quantity: i32,
    pub keyholder: Option<String>,
    pub division: Option<String>,
    pub ministry: Option<String>,
}

impl OverviewRow {
    /// Row for a key and an optional holding.
    ///
    /// A holding whose user no longer exists keeps its quantity but reports
    /// null holder columns, matching a left join.
    pub fn new(key: &Key, holding: Option<(&Assignment, Option<&User>)>) -> Self {
        let (quantity, holder) = match holding {
            Some((assignment, user)) => (assignment.quantity, user),
            None => (0, None),
        };
        Self {
            id: key.id,
            key_type: key.key_type.clone(),
            zone: key.zone.clone(),
            usage: key.usage.clone(),
            keyname: key.keyname.clone(),
            keydescription: key.keydescription.clone(),
            keytag: key.keytag.clone(),
            total_no_of_key: key.total_no_of_key,
            quantity,
            keyholder: holder.map(|user| user.name.clone()),
            division: holder.map(|user| user.division.clone()),
            ministry: holder.map(|user| user.ministry.clone()),
        }
    }

    /// Aggregate view ordering: key id, then holder name with nulls last.
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id).then_with(|| {
            match (&self.keyholder, &other.keyholder) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        })
    }
}

/// Every collection the export page turns into spreadsheet sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InventoryExport {
    pub keys: Vec<Key>,
    pub users: Vec<User>,
    pub assignments: Vec<Assignment>,
    pub overall: Vec<OverviewRow>,
}
