//! Reconciler behaviour against an in-test ledger.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{ErrorCode, KeyDraftParts};

const SPARE: UserId = DEFAULT_SPARE_USER_ID;

#[derive(Default)]
struct StubLedger {
    keys: BTreeMap<KeyId, Key>,
    users: BTreeMap<UserId, User>,
    rows: BTreeMap<AssignmentId, Assignment>,
    next_id: i32,
    fail_writes: bool,
}

impl StubLedger {
    fn next(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn add_user(&mut self, id: UserId, name: &str) {
        self.users.insert(
            id,
            User {
                id,
                name: name.into(),
                division: String::new(),
                ministry: String::new(),
            },
        );
    }

    fn spare_quantity(&self, key_id: KeyId) -> Option<i32> {
        self.rows
            .values()
            .find(|row| row.user_id == SPARE && row.key_id == key_id)
            .map(|row| row.quantity)
    }

    fn spare_rows(&self, key_id: KeyId) -> usize {
        self.rows
            .values()
            .filter(|row| row.user_id == SPARE && row.key_id == key_id)
            .count()
    }

    fn assert_balanced(&self) {
        for key in self.keys.values() {
            let held: i32 = self
                .rows
                .values()
                .filter(|row| row.key_id == key.id)
                .map(|row| row.quantity)
                .sum();
            assert_eq!(held, key.total_no_of_key, "stock for key {} drifted", key.id);
        }
    }

    fn write_guard(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            Err(StoreError::query("write refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SpareLedger for StubLedger {
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
        Ok(self.rows.get(&id).cloned())
    }

    async fn find_holding(
        &mut self,
        user_id: UserId,
        key_id: KeyId,
    ) -> Result<Option<Assignment>, StoreError> {
        Ok(self
            .rows
            .values()
            .find(|row| row.user_id == user_id && row.key_id == key_id)
            .cloned())
    }

    async fn insert_assignment(&mut self, row: NewAssignment) -> Result<Assignment, StoreError> {
        self.write_guard()?;
        let id = self.next();
        let row = row.into_assignment(id);
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn overwrite_assignment(&mut self, assignment: &Assignment) -> Result<(), StoreError> {
        self.write_guard()?;
        self.rows.insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn remove_assignment(&mut self, id: AssignmentId) -> Result<(), StoreError> {
        self.write_guard()?;
        self.rows.remove(&id);
        Ok(())
    }

    async fn adjust_quantity(&mut self, id: AssignmentId, delta: i32) -> Result<i32, StoreError> {
        self.write_guard()?;
        let row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::query("row vanished"))?;
        row.quantity += delta;
        Ok(row.quantity)
    }

    async fn insert_key(&mut self, draft: KeyDraft) -> Result<Key, StoreError> {
        self.write_guard()?;
        let id = self.next();
        let key = draft.into_key(id);
        self.keys.insert(id, key.clone());
        Ok(key)
    }

    async fn overwrite_key(&mut self, key: &Key) -> Result<(), StoreError> {
        self.write_guard()?;
        self.keys.insert(key.id, key.clone());
        Ok(())
    }
}

fn key_draft(name: &str, total: i32) -> KeyDraft {
    KeyDraft::try_new(KeyDraftParts {
        key_type: "Master".into(),
        zone: "North".into(),
        usage: "Office".into(),
        keyname: name.into(),
        total_no_of_key: total,
        ..KeyDraftParts::default()
    })
    .expect("valid key draft")
}

fn draft(user_id: UserId, key_id: KeyId, quantity: i32) -> AssignmentDraft {
    AssignmentDraft::try_new(user_id, key_id, quantity).expect("valid assignment draft")
}

#[fixture]
fn reconciler() -> SpareReconciler {
    SpareReconciler::default()
}

/// Ledger holding users Ada (1) and Bob (2) and one key with five copies.
async fn seeded(reconciler: &SpareReconciler) -> (StubLedger, KeyId) {
    let mut ledger = StubLedger {
        next_id: 100,
        ..StubLedger::default()
    };
    ledger.add_user(1, "Ada");
    ledger.add_user(2, "Bob");
    ledger.add_user(SPARE, SPARE_HOLDER_NAME);
    let key = reconciler
        .on_key_create(&mut ledger, key_draft("Front door", 5))
        .await
        .expect("key created");
    (ledger, key.id)
}

#[rstest]
#[tokio::test]
async fn ensure_spare_row_is_idempotent(reconciler: SpareReconciler) {
    let mut ledger = StubLedger::default();

    let first = reconciler
        .ensure_spare_row(&mut ledger, 9)
        .await
        .expect("spare row created");
    let second = reconciler
        .ensure_spare_row(&mut ledger, 9)
        .await
        .expect("spare row reused");

    assert_eq!(first, second);
    assert_eq!(first.quantity, 0);
    assert_eq!(first.keyholder, SPARE_HOLDER_NAME);
    assert_eq!(first.keyname, SPARE_KEY_NAME);
    assert_eq!(ledger.spare_rows(9), 1);
}

#[rstest]
#[tokio::test]
async fn key_create_seeds_spare_with_full_stock(reconciler: SpareReconciler) {
    let (ledger, key_id) = seeded(&reconciler).await;

    assert_eq!(ledger.spare_quantity(key_id), Some(5));
    let spare = ledger
        .rows
        .values()
        .find(|row| row.user_id == SPARE)
        .expect("spare row");
    assert_eq!(spare.keyname, "Front door");
    ledger.assert_balanced();
}

#[rstest]
#[tokio::test]
async fn create_update_delete_round_trip_restores_spare(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;

    let created = reconciler
        .on_assignment_create(&mut ledger, draft(1, key_id, 2))
        .await
        .expect("assignment created");
    assert_eq!(created.keyholder, "Ada");
    assert_eq!(created.keyname, "Front door");
    assert_eq!(ledger.spare_quantity(key_id), Some(3));
    ledger.assert_balanced();

    reconciler
        .on_assignment_update(&mut ledger, created.id, draft(1, key_id, 4))
        .await
        .expect("assignment updated");
    assert_eq!(ledger.spare_quantity(key_id), Some(1));
    ledger.assert_balanced();

    let deleted = reconciler
        .on_assignment_delete(&mut ledger, created.id)
        .await
        .expect("assignment deleted");
    assert_eq!(deleted.quantity, 4);
    assert_eq!(ledger.spare_quantity(key_id), Some(5));
    ledger.assert_balanced();
}

#[rstest]
#[tokio::test]
async fn create_rejects_more_than_spare_without_writing(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;
    let rows_before = ledger.rows.clone();

    let err = reconciler
        .on_assignment_create(&mut ledger, draft(1, key_id, 6))
        .await
        .expect_err("over-assignment must fail");

    assert_eq!(
        err,
        ReconcileError::InsufficientStock {
            key_id,
            available: 5,
            requested: 6,
        }
    );
    assert_eq!(ledger.rows, rows_before);
}

#[rstest]
#[tokio::test]
async fn create_reports_unknown_user_and_key(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;

    let unknown_user = reconciler
        .on_assignment_create(&mut ledger, draft(55, key_id, 1))
        .await
        .expect_err("unknown user");
    assert_eq!(unknown_user, ReconcileError::UserNotFound { user_id: 55 });

    let unknown_key = reconciler
        .on_assignment_create(&mut ledger, draft(1, 999, 0))
        .await
        .expect_err("unknown key");
    assert_eq!(unknown_key, ReconcileError::KeyNotFound { key_id: 999 });
}

#[rstest]
#[tokio::test]
async fn update_moves_stock_between_keys(reconciler: SpareReconciler) {
    let (mut ledger, first) = seeded(&reconciler).await;
    let second = reconciler
        .on_key_create(&mut ledger, key_draft("Back door", 3))
        .await
        .expect("second key")
        .id;
    let held = reconciler
        .on_assignment_create(&mut ledger, draft(2, first, 2))
        .await
        .expect("assignment created");

    let moved = reconciler
        .on_assignment_update(&mut ledger, held.id, draft(2, second, 3))
        .await
        .expect("assignment moved");

    assert_eq!(moved.keyname, "Back door");
    assert_eq!(ledger.spare_quantity(first), Some(5));
    assert_eq!(ledger.spare_quantity(second), Some(0));
    ledger.assert_balanced();
}

#[rstest]
#[tokio::test]
async fn update_revalidates_available_stock(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;
    let held = reconciler
        .on_assignment_create(&mut ledger, draft(1, key_id, 2))
        .await
        .expect("assignment created");

    let err = reconciler
        .on_assignment_update(&mut ledger, held.id, draft(1, key_id, 6))
        .await
        .expect_err("update beyond stock must fail");

    assert_eq!(
        err,
        ReconcileError::InsufficientStock {
            key_id,
            available: 5,
            requested: 6,
        }
    );
    assert_eq!(ledger.spare_quantity(key_id), Some(3));
}

#[rstest]
#[tokio::test]
async fn missing_assignment_is_not_found(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;

    let update = reconciler
        .on_assignment_update(&mut ledger, 4242, draft(1, key_id, 1))
        .await
        .expect_err("missing row");
    let delete = reconciler
        .on_assignment_delete(&mut ledger, 4242)
        .await
        .expect_err("missing row");

    assert_eq!(update, ReconcileError::AssignmentNotFound { id: 4242 });
    assert_eq!(delete, ReconcileError::AssignmentNotFound { id: 4242 });
}

#[rstest]
#[tokio::test]
async fn spare_rows_cannot_be_edited_directly(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;
    let spare_id = ledger
        .find_holding(SPARE, key_id)
        .await
        .expect("lookup")
        .expect("spare row")
        .id;

    let create = reconciler
        .on_assignment_create(&mut ledger, draft(SPARE, key_id, 1))
        .await;
    let update = reconciler
        .on_assignment_update(&mut ledger, spare_id, draft(1, key_id, 1))
        .await;
    let delete = reconciler.on_assignment_delete(&mut ledger, spare_id).await;

    for result in [create, update, delete] {
        assert_eq!(result, Err(ReconcileError::ReservedHolder));
    }
    assert_eq!(ledger.spare_quantity(key_id), Some(5));
}

#[rstest]
#[case::grow(8, Some(8))]
#[case::shrink(2, Some(2))]
#[tokio::test]
async fn key_update_moves_total_change_through_spare(
    reconciler: SpareReconciler,
    #[case] new_total: i32,
    #[case] expected_spare: Option<i32>,
) {
    let (mut ledger, key_id) = seeded(&reconciler).await;

    let updated = reconciler
        .on_key_update(&mut ledger, key_id, key_draft("Front door", new_total))
        .await
        .expect("key update")
        .expect("key exists");

    assert_eq!(updated.total_no_of_key, new_total);
    assert_eq!(ledger.spare_quantity(key_id), expected_spare);
    ledger.assert_balanced();
}

#[rstest]
#[tokio::test]
async fn key_update_cannot_shrink_below_assigned_stock(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;
    reconciler
        .on_assignment_create(&mut ledger, draft(1, key_id, 4))
        .await
        .expect("assignment created");

    let err = reconciler
        .on_key_update(&mut ledger, key_id, key_draft("Front door", 2))
        .await
        .expect_err("shrink below assigned stock");

    assert_eq!(
        err,
        ReconcileError::InsufficientStock {
            key_id,
            available: 1,
            requested: 3,
        }
    );
    assert_eq!(ledger.keys[&key_id].total_no_of_key, 5);
}

#[rstest]
#[tokio::test]
async fn key_update_of_missing_key_is_none(reconciler: SpareReconciler) {
    let mut ledger = StubLedger::default();
    let result = reconciler
        .on_key_update(&mut ledger, 3, key_draft("Ghost", 1))
        .await
        .expect("lookup succeeds");
    assert!(result.is_none());
}

#[rstest]
#[tokio::test]
async fn store_failures_propagate(reconciler: SpareReconciler) {
    let (mut ledger, key_id) = seeded(&reconciler).await;
    ledger.fail_writes = true;

    let err = reconciler
        .on_assignment_create(&mut ledger, draft(1, key_id, 1))
        .await
        .expect_err("write failure");

    assert_eq!(err, ReconcileError::Store(StoreError::query("write refused")));
}

#[rstest]
#[case(ReconcileError::InsufficientStock { key_id: 1, available: 0, requested: 1 }, ErrorCode::InvalidRequest, "Insufficient spare key quantity")]
#[case(ReconcileError::UserNotFound { user_id: 4 }, ErrorCode::InvalidRequest, "User not found")]
#[case(ReconcileError::KeyNotFound { key_id: 4 }, ErrorCode::InvalidRequest, "Key not found")]
#[case(ReconcileError::AssignmentNotFound { id: 4 }, ErrorCode::NotFound, "Record not found")]
#[case(ReconcileError::ReservedHolder, ErrorCode::InvalidRequest, "Spare holder stock is managed automatically")]
#[case(ReconcileError::Store(StoreError::connection("refused")), ErrorCode::ServiceUnavailable, "refused")]
fn maps_to_domain_errors(
    #[case] error: ReconcileError,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mapped = Error::from(error);
    assert_eq!(mapped.code(), code);
    assert_eq!(mapped.message(), message);
}
