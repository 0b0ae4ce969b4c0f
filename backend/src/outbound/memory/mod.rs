//! In-process inventory store.
//!
//! Implements the same driving ports as the Diesel adapters. Every write
//! stages a copy of the tables, runs the operation against the copy and
//! swaps it in only on success, so a failed operation leaves no trace.
//! A `tokio::sync::Mutex` serialises operations.
//!
//! Used when no database URL is configured and as the store behind HTTP
//! integration tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::ports::{
    AssignmentService, InventoryOverview, KeyCatalogue, SpareLedger, StoreError, UserDirectory,
};
use crate::domain::{
    Assignment, AssignmentDraft, AssignmentId, Error, InventoryExport, Key, KeyDraft, KeyId,
    NewAssignment, OverviewRow, SPARE_HOLDER_NAME, SpareReconciler, User, UserDraft, UserId,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    keys: BTreeMap<KeyId, Key>,
    users: BTreeMap<UserId, User>,
    assignments: BTreeMap<AssignmentId, Assignment>,
    last_key_id: KeyId,
    last_user_id: UserId,
    last_assignment_id: AssignmentId,
}

impl Tables {
    fn with_spare_holder(spare_user_id: UserId) -> Self {
        let mut tables = Self::default();
        tables.users.insert(
            spare_user_id,
            User {
                id: spare_user_id,
                name: SPARE_HOLDER_NAME.to_owned(),
                division: String::new(),
                ministry: String::new(),
            },
        );
        tables.last_user_id = spare_user_id.max(0);
        tables
    }

    fn key_list(&self) -> Vec<Key> {
        self.keys.values().cloned().collect()
    }

    fn user_list(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    fn assignment_list(&self) -> Vec<Assignment> {
        self.assignments
            .values()
            .map(|row| {
                let mut row = row.clone();
                if let Some(user) = self.users.get(&row.user_id) {
                    row.keyholder = user.name.clone();
                }
                if let Some(key) = self.keys.get(&row.key_id) {
                    row.keyname = key.keyname.clone();
                }
                row
            })
            .collect()
    }

    fn overview(&self) -> Vec<OverviewRow> {
        let mut rows = Vec::new();
        for key in self.keys.values() {
            let mut holdings = self
                .assignments
                .values()
                .filter(|row| row.key_id == key.id)
                .peekable();
            if holdings.peek().is_none() {
                rows.push(OverviewRow::new(key, None));
                continue;
            }
            for holding in holdings {
                let holder = self.users.get(&holding.user_id);
                rows.push(OverviewRow::new(key, Some((holding, holder))));
            }
        }
        rows.sort_by(OverviewRow::display_order);
        rows
    }

    fn missing_row(id: AssignmentId) -> StoreError {
        StoreError::query(format!("assignment {id} does not exist"))
    }
}

#[async_trait]
impl SpareLedger for Tables {
    async fn find_key(&mut self, id: KeyId) -> Result<Option<Key>, StoreError> {
        Ok(self.keys.get(&id).cloned())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).cloned())
    }

    async fn find_assignment(
        &mut self,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, StoreError> {
        Ok(self.assignments.get(&id).cloned())
    }

    async fn find_holding(
        &mut self,
        user_id: UserId,
        key_id: KeyId,
    ) -> Result<Option<Assignment>, StoreError> {
        Ok(self
            .assignments
            .values()
            .find(|row| row.user_id == user_id && row.key_id == key_id)
            .cloned())
    }

    async fn insert_assignment(&mut self, row: NewAssignment) -> Result<Assignment, StoreError> {
        self.last_assignment_id += 1;
        let row = row.into_assignment(self.last_assignment_id);
        self.assignments.insert(row.id, row.clone());
        Ok(row)
    }

    async fn overwrite_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError> {
        let row = self
            .assignments
            .get_mut(&assignment.id)
            .ok_or_else(|| Self::missing_row(assignment.id))?;
        *row = assignment.clone();
        Ok(())
    }

    async fn remove_assignment(&mut self, id: AssignmentId) -> Result<(), StoreError> {
        self.assignments.remove(&id);
        Ok(())
    }

    async fn adjust_quantity(&mut self, id: AssignmentId, delta: i32) -> Result<i32, StoreError> {
        let row = self
            .assignments
            .get_mut(&id)
            .ok_or_else(|| Self::missing_row(id))?;
        row.quantity += delta;
        Ok(row.quantity)
    }

    async fn insert_key(&mut self, draft: KeyDraft) -> Result<Key, StoreError> {
        self.last_key_id += 1;
        let key = draft.into_key(self.last_key_id);
        self.keys.insert(key.id, key.clone());
        Ok(key)
    }

    async fn overwrite_key(&mut self, key: &Key) -> Result<(), StoreError> {
        self.keys.insert(key.id, key.clone());
        Ok(())
    }
}

/// Shared in-memory store; clones refer to the same tables.
///
/// # Examples
/// ```
/// use key_inventory::domain::SpareReconciler;
/// use key_inventory::domain::ports::UserDirectory;
/// use key_inventory::outbound::memory::MemoryInventory;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = MemoryInventory::new(SpareReconciler::default());
/// let users = store.list_users().await.unwrap();
/// assert_eq!(users[0].name, "Spare");
/// # });
/// ```
#[derive(Clone)]
pub struct MemoryInventory {
    tables: Arc<Mutex<Tables>>,
    reconciler: SpareReconciler,
}

impl MemoryInventory {
    /// Empty store containing only the spare holder.
    pub fn new(reconciler: SpareReconciler) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::with_spare_holder(
                reconciler.spare_user_id(),
            ))),
            reconciler,
        }
    }
}

/// Run `$op` against a staged copy of the tables and commit it on success.
macro_rules! staged {
    ($self:ident, |$ledger:ident| $op:expr) => {{
        let mut tables = $self.tables.lock().await;
        let mut staged = tables.clone();
        let $ledger = &mut staged;
        let result = $op.await;
        if result.is_ok() {
            *tables = staged;
        }
        result
    }};
}

#[async_trait]
impl KeyCatalogue for MemoryInventory {
    async fn list_keys(&self) -> Result<Vec<Key>, Error> {
        Ok(self.tables.lock().await.key_list())
    }

    async fn create_key(&self, draft: KeyDraft) -> Result<Key, Error> {
        let key = staged!(self, |ledger| self.reconciler.on_key_create(ledger, draft))?;
        info!(key_id = key.id, total = key.total_no_of_key, "key created");
        Ok(key)
    }

    async fn update_key(&self, id: KeyId, draft: KeyDraft) -> Result<Option<Key>, Error> {
        Ok(staged!(self, |ledger| self
            .reconciler
            .on_key_update(ledger, id, draft))?)
    }

    async fn delete_key(&self, id: KeyId) -> Result<Option<Key>, Error> {
        Ok(self.tables.lock().await.keys.remove(&id))
    }
}

#[async_trait]
impl UserDirectory for MemoryInventory {
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.tables.lock().await.user_list())
    }

    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let mut tables = self.tables.lock().await;
        tables.last_user_id += 1;
        let user = draft.into_user(tables.last_user_id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<Option<User>, Error> {
        let mut tables = self.tables.lock().await;
        let Some(row) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        *row = draft.into_user(id);
        Ok(Some(row.clone()))
    }

    async fn delete_user(&self, id: UserId) -> Result<Option<User>, Error> {
        self.reconciler.guard_holder(id)?;
        Ok(self.tables.lock().await.users.remove(&id))
    }
}

#[async_trait]
impl AssignmentService for MemoryInventory {
    async fn list_assignments(&self) -> Result<Vec<Assignment>, Error> {
        Ok(self.tables.lock().await.assignment_list())
    }

    async fn create_assignment(&self, draft: AssignmentDraft) -> Result<Assignment, Error> {
        Ok(staged!(self, |ledger| self
            .reconciler
            .on_assignment_create(ledger, draft))?)
    }

    async fn update_assignment(
        &self,
        id: AssignmentId,
        draft: AssignmentDraft,
    ) -> Result<Assignment, Error> {
        Ok(staged!(self, |ledger| self
            .reconciler
            .on_assignment_update(ledger, id, draft))?)
    }

    async fn delete_assignment(&self, id: AssignmentId) -> Result<Assignment, Error> {
        Ok(staged!(self, |ledger| self
            .reconciler
            .on_assignment_delete(ledger, id))?)
    }
}

#[async_trait]
impl InventoryOverview for MemoryInventory {
    async fn overview(&self) -> Result<Vec<OverviewRow>, Error> {
        Ok(self.tables.lock().await.overview())
    }

    async fn export(&self) -> Result<InventoryExport, Error> {
        let tables = self.tables.lock().await;
        Ok(InventoryExport {
            keys: tables.key_list(),
            users: tables.user_list(),
            assignments: tables.assignment_list(),
            overall: tables.overview(),
        })
    }
}
