use std::sync::Arc;

use super::require_role;
use crate::directory::ActorDirectory;
use crate::error::Result;
use crate::models::{Actor, Role, TestRequest, TestRequestId};
use crate::services::{RequestQueryService, RequestUpdateService};
use crate::state_machine::{ConsultationPayload, RequestStatus};

/// Doctor-facing desk
#[derive(Clone)]
pub struct ConsultationDesk {
    directory: Arc<dyn ActorDirectory>,
    queries: RequestQueryService,
    updates: RequestUpdateService,
}

impl ConsultationDesk {
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

    async fn doctor(&self) -> Result<Actor> {
        require_role(self.directory.current_actor().await?, Role::Doctor)
    }

    /// Lab-completed requests waiting for a doctor
    pub async fn in_queue(&self) -> Result<Vec<TestRequest>> {
        self.doctor().await?;
        self.queries
            .find_by_status(RequestStatus::LabTestCompleted)
            .await
    }

    /// Requests assigned to the signed-in doctor
    pub async fn assigned_to_me(&self) -> Result<Vec<TestRequest>> {
        let doctor = self.doctor().await?;
        self.queries.find_by_assigned_doctor(&doctor).await
    }

    pub async fn assign(&self, id: TestRequestId) -> Result<TestRequest> {
        let doctor = self.doctor().await?;
        self.updates.assign_for_consultation(id, &doctor).await
    }

    pub async fn update(
        &self,
        id: TestRequestId,
        payload: ConsultationPayload,
    ) -> Result<TestRequest> {
        let doctor = self.doctor().await?;
        self.updates.update_consultation(id, payload, &doctor).await
    }
}
