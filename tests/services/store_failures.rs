use std::sync::Arc;

use testflow_core::config::WorkflowConfig;
use testflow_core::models::TestRequestId;
use testflow_core::state_machine::{ConsultationPayload, RequestStatus};
use testflow_core::{WorkflowError, WorkflowSystem};

use crate::common::fixtures::{doctor, tester};
use crate::common::unavailable_store::UnavailableStore;

fn unreachable_system() -> WorkflowSystem {
    WorkflowSystem::with_store(
        Arc::new(UnavailableStore::new("connection refused")),
        &WorkflowConfig::default(),
    )
}

fn assert_store_unavailable(err: WorkflowError) {
    match &err {
        WorkflowError::StoreUnavailable { reason } => {
            assert!(reason.contains("connection refused"), "reason was {reason}");
        }
        other => panic!("Expected StoreUnavailable, got {other:?}"),
    }
    assert!(!err.is_client_error());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_queries_surface_store_unavailable() {
    let system = unreachable_system();
    let queries = system.queries();

    assert_store_unavailable(
        queries
            .find_by_status(RequestStatus::LabTestCompleted)
            .await
            .unwrap_err(),
    );
    assert_store_unavailable(queries.find_by_assigned_doctor(&doctor()).await.unwrap_err());
    assert_store_unavailable(queries.find_by_assigned_tester(&tester()).await.unwrap_err());
    assert_store_unavailable(queries.find_by_id(TestRequestId(42)).await.unwrap_err());
    assert_store_unavailable(queries.history(TestRequestId(42)).await.unwrap_err());
}

#[tokio::test]
async fn test_updates_surface_store_unavailable() {
    let system = unreachable_system();
    let id = TestRequestId(42);

    assert_store_unavailable(
        system
            .updates()
            .assign_for_consultation(id, &doctor())
            .await
            .unwrap_err(),
    );
    assert_store_unavailable(
        system
            .updates()
            .update_consultation(id, ConsultationPayload::new("NO_ISSUES"), &doctor())
            .await
            .unwrap_err(),
    );
    assert_store_unavailable(
        system
            .updates()
            .assign_for_lab_test(id, &tester())
            .await
            .unwrap_err(),
    );
}
