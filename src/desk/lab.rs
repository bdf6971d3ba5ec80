use std::sync::Arc;

use super::require_role;
use crate::directory::ActorDirectory;
use crate::error::Result;
use crate::models::{Actor, Role, TestRequest, TestRequestId};
use crate::services::{RequestQueryService, RequestUpdateService};
use crate::state_machine::{LabResultPayload, RequestStatus};

/// Lab-technician-facing desk
#[derive(Clone)]
pub struct LabDesk {
    directory: Arc<dyn ActorDirectory>,
    queries: RequestQueryService,
    updates: RequestUpdateService,
}

impl LabDesk {
    pub fn new(
        directory: Arc<dyn ActorDirectory>,
        queries: RequestQueryService,
        updates: RequestUpdateService,
    ) -> Self {
        Self {
            directory,
            queries,
            updates,
        }
    }

    async fn tester(&self) -> Result<Actor> {
        require_role(self.directory.current_actor().await?, Role::Tester)
    }

    /// Newly registered requests nobody has claimed yet
    pub async fn in_queue(&self) -> Result<Vec<TestRequest>> {
        self.tester().await?;
        self.queries.find_by_status(RequestStatus::Created).await
    }

    pub async fn assigned_to_me(&self) -> Result<Vec<TestRequest>> {
        let tester = self.tester().await?;
        self.queries.find_by_assigned_tester(&tester).await
    }

    pub async fn assign(&self, id: TestRequestId) -> Result<TestRequest> {
        let tester = self.tester().await?;
        self.updates.assign_for_lab_test(id, &tester).await
    }

    pub async fn start(&self, id: TestRequestId) -> Result<TestRequest> {
        let tester = self.tester().await?;
        self.updates.start_lab_test(id, &tester).await
    }

    pub async fn update(
        &self,
        id: TestRequestId,
        payload: LabResultPayload,
    ) -> Result<TestRequest> {
        let tester = self.tester().await?;
        self.updates.update_lab_test(id, payload, &tester).await
    }
}
