use std::sync::Arc;
use tracing::{error, warn};

use crate::error::{Result, WorkflowError};
use crate::logging::{log_rejection, log_transition};
use crate::models::{Actor, TestRequest, TestRequestId};
use crate::state_machine::{
    ConsultationPayload, LabResultPayload, RequestStatus, TransitionContext, TransitionPayload,
    WorkflowEngine,
};
use crate::store::RequestStore;

/// The only writer of test requests.
///
/// Each call is a single load, decide, compare-and-save round with no
/// in-process locking. A lost race surfaces as `ConcurrentModification` and
/// leaves the stored record untouched; callers retry from a fresh load.
#[derive(Clone)]
pub struct RequestUpdateService {
    store: Arc<dyn RequestStore>,
    engine: WorkflowEngine,
}

impl RequestUpdateService {
    pub fn new(store: Arc<dyn RequestStore>, engine: WorkflowEngine) -> Self {
        Self { store, engine }
    }

    /// CREATED -> INITIATED; the tester becomes the assigned technician
    pub async fn assign_for_lab_test(
        &self,
        id: TestRequestId,
        tester: &Actor,
    ) -> Result<TestRequest> {
        self.run(
            "assign_for_lab_test",
            id,
            tester,
            RequestStatus::Initiated,
            TransitionPayload::None,
            TransitionContext::default(),
        )
        .await
    }

    /// INITIATED -> LAB_TEST_IN_PROGRESS, assigned technician only
    pub async fn start_lab_test(&self, id: TestRequestId, tester: &Actor) -> Result<TestRequest> {
        self.run(
            "start_lab_test",
            id,
            tester,
            RequestStatus::LabTestInProgress,
            TransitionPayload::None,
            TransitionContext::default(),
        )
        .await
    }

    /// LAB_TEST_IN_PROGRESS -> LAB_TEST_COMPLETED with the lab result attached
    pub async fn update_lab_test(
        &self,
        id: TestRequestId,
        payload: LabResultPayload,
        tester: &Actor,
    ) -> Result<TestRequest> {
        self.run(
            "update_lab_test",
            id,
            tester,
            RequestStatus::LabTestCompleted,
            payload.into(),
            TransitionContext::default(),
        )
        .await
    }

    /// LAB_TEST_COMPLETED -> DIAGNOSIS_IN_PROCESS; the doctor becomes the assignee
    pub async fn assign_for_consultation(
        &self,
        id: TestRequestId,
        doctor: &Actor,
    ) -> Result<TestRequest> {
        self.run(
            "assign_for_consultation",
            id,
            doctor,
            RequestStatus::DiagnosisInProcess,
            TransitionPayload::None,
            TransitionContext::default(),
        )
        .await
    }

    /// DIAGNOSIS_IN_PROCESS -> COMPLETED, assigned doctor only
    pub async fn update_consultation(
        &self,
        id: TestRequestId,
        payload: ConsultationPayload,
        doctor: &Actor,
    ) -> Result<TestRequest> {
        self.run(
            "update_consultation",
            id,
            doctor,
            RequestStatus::Completed,
            payload.into(),
            TransitionContext::default(),
        )
        .await
    }

    /// General entry point for callers that carry their own audit context
    pub async fn transition(
        &self,
        id: TestRequestId,
        actor: &Actor,
        target: RequestStatus,
        payload: TransitionPayload,
        context: TransitionContext,
    ) -> Result<TestRequest> {
        self.run("transition", id, actor, target, payload, context)
            .await
    }

    async fn run(
        &self,
        operation: &str,
        id: TestRequestId,
        actor: &Actor,
        target: RequestStatus,
        payload: TransitionPayload,
        context: TransitionContext,
    ) -> Result<TestRequest> {
        let request = self.store.load(id).await.map_err(|e| {
            let err = WorkflowError::from(e);
            if !err.is_client_error() {
                error!(
                    operation = %operation,
                    request_id = %id,
                    error = %err,
                    "Failed to load test request"
                );
            }
            err
        })?;
        let expected_version = request.version;

        let applied = match self
            .engine
            .validate_transition(&request, actor, target)
            .and_then(|approved| approved.apply(payload, context))
        {
            Ok(applied) => applied,
            Err(err) => {
                log_rejection(operation, id, actor, &err.to_string());
                return Err(err.into());
            }
        };

        let saved = self
            .store
            .compare_and_save(&applied.request, expected_version, &applied.record)
            .await
            .map_err(|e| {
                let err = WorkflowError::from(e);
                if err.is_retryable() {
                    warn!(
                        operation = %operation,
                        request_id = %id,
                        expected_version = expected_version,
                        "Lost compare-and-save race"
                    );
                } else {
                    error!(
                        operation = %operation,
                        request_id = %id,
                        error = %err,
                        "Failed to save test request"
                    );
                }
                err
            })?;

        log_transition(
            operation,
            id,
            applied.record.from_status,
            applied.record.to_status,
            actor,
            saved.version,
        );
        Ok(saved)
    }
}
