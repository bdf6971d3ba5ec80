use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::models::{Actor, TestRequest, TestRequestId, TransitionRecord};
use crate::state_machine::states::RequestStatus;
use crate::store::{AssigneeSlot, RequestStore};

/// Read-only projections used to build per-actor work queues.
///
/// Takes no locks; results may trail an in-flight update but never show a
/// half-written record.
#[derive(Clone)]
pub struct RequestQueryService {
    store: Arc<dyn RequestStore>,
}

impl RequestQueryService {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self { store }
    }

    /// All requests currently in `status`, ascending by id
    pub async fn find_by_status(&self, status: RequestStatus) -> Result<Vec<TestRequest>> {
        let requests = self.store.query_by_status(status).await?;
        debug!(status = %status, count = requests.len(), "Queried requests by status");
        Ok(requests)
    }

    /// Requests assigned to `doctor` in any status
    pub async fn find_by_assigned_doctor(&self, doctor: &Actor) -> Result<Vec<TestRequest>> {
        let requests = self
            .store
            .query_by_assignee(doctor.id, AssigneeSlot::Doctor)
            .await?;
        debug!(actor_id = %doctor.id, count = requests.len(), "Queried requests by doctor");
        Ok(requests)
    }

    /// Requests assigned to `tester` in any status
    pub async fn find_by_assigned_tester(&self, tester: &Actor) -> Result<Vec<TestRequest>> {
        let requests = self
            .store
            .query_by_assignee(tester.id, AssigneeSlot::LabTechnician)
            .await?;
        debug!(actor_id = %tester.id, count = requests.len(), "Queried requests by tester");
        Ok(requests)
    }

    pub async fn find_by_id(&self, id: TestRequestId) -> Result<TestRequest> {
        Ok(self.store.load(id).await?)
    }

    /// Committed transitions for a request, oldest first
    pub async fn history(&self, id: TestRequestId) -> Result<Vec<TransitionRecord>> {
        Ok(self.store.load_transitions(id).await?)
    }
}
