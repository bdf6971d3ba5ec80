//! # Request Store
//!
//! Durable keyed storage for test requests. The workflow only ever writes
//! through [`RequestStore::compare_and_save`], which rejects stale writes and
//! commits the request and its transition record together.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;

use crate::models::{ActorId, NewTestRequest, TestRequest, TestRequestId, TransitionRecord};
use crate::state_machine::errors::PersistenceResult;
use crate::state_machine::states::RequestStatus;

pub use in_memory::InMemoryRequestStore;
#[cfg(feature = "postgres")]
pub use postgres::PgRequestStore;

/// Which assignment slot of a request to match against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeSlot {
    LabTechnician,
    Doctor,
}

impl AssigneeSlot {
    pub fn matches(&self, request: &TestRequest, actor: ActorId) -> bool {
        let assigned = match self {
            Self::LabTechnician => request.assigned_lab_technician,
            Self::Doctor => request.assigned_doctor,
        };
        assigned == Some(actor)
    }
}

/// Storage collaborator consumed by the query and update services.
///
/// Listings are returned in ascending request id order.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Register a new request in `CREATED` at version 0
    async fn insert(&self, new_request: NewTestRequest) -> PersistenceResult<TestRequest>;

    /// Load a request by id, `NotFound` if absent
    async fn load(&self, id: TestRequestId) -> PersistenceResult<TestRequest>;

    /// Persist `request` only if the stored version still equals
    /// `expected_version`, appending `transition` in the same write.
    /// Returns the saved record with its new version.
    async fn compare_and_save(
        &self,
        request: &TestRequest,
        expected_version: i64,
        transition: &TransitionRecord,
    ) -> PersistenceResult<TestRequest>;

    async fn query_by_status(&self, status: RequestStatus) -> PersistenceResult<Vec<TestRequest>>;

    async fn query_by_assignee(
        &self,
        actor: ActorId,
        slot: AssigneeSlot,
    ) -> PersistenceResult<Vec<TestRequest>>;

    /// Transition history for a request in commit order
    async fn load_transitions(&self, id: TestRequestId) -> PersistenceResult<Vec<TransitionRecord>>;
}
