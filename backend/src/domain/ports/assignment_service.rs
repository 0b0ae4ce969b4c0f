//! Driving port for assignments. Writes go through the spare reconciler.

use async_trait::async_trait;

use crate::domain::{Assignment, AssignmentDraft, AssignmentId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// All rows, names taken from the live user and key where they still
    /// exist and from the stored snapshot otherwise.
    async fn list_assignments(&self) -> Result<Vec<Assignment>, Error>;

    async fn create_assignment(&self, draft: AssignmentDraft) -> Result<Assignment, Error>;

    async fn update_assignment(
        &self,
        id: AssignmentId,
        draft: AssignmentDraft,
    ) -> Result<Assignment, Error>;

    async fn delete_assignment(&self, id: AssignmentId) -> Result<Assignment, Error>;
}
