use std::sync::Arc;

use testflow_core::directory::{ActorDirectory, StaticActorDirectory};
use testflow_core::models::TestRequestId;
use testflow_core::state_machine::{ConsultationPayload, LabResultPayload, RequestStatus};
use testflow_core::store::RequestStore;
use testflow_core::WorkflowError;

use crate::common::fixtures::{doctor, request_in, seeded_system, tester};

#[tokio::test]
async fn test_consultation_desk_rejects_non_doctors_before_store() {
    let (system, store) = seeded_system(vec![request_in(7, RequestStatus::LabTestCompleted)]);
    let directory = Arc::new(StaticActorDirectory::new(tester()));
    let desk = system.consultation_desk(directory);

    assert!(matches!(desk.in_queue().await, Err(WorkflowError::Unauthorized)));
    assert!(matches!(
        desk.assign(TestRequestId(7)).await,
        Err(WorkflowError::Unauthorized)
    ));
    assert!(matches!(
        desk.assign(TestRequestId(404)).await,
        Err(WorkflowError::Unauthorized)
    ));

    assert!(store
        .load_transitions(TestRequestId(7))
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.load(TestRequestId(7)).await.unwrap().version, 0);
}

#[tokio::test]
async fn test_anonymous_caller_is_unauthorized() {
    let (system, _store) = seeded_system(vec![]);
    let desk = system.lab_desk(Arc::new(StaticActorDirectory::anonymous()));

    assert!(matches!(desk.in_queue().await, Err(WorkflowError::Unauthorized)));
}

#[tokio::test]
async fn test_consultation_desk_flow() {
    let (system, _store) = seeded_system(vec![
        request_in(7, RequestStatus::LabTestCompleted),
        request_in(8, RequestStatus::Created),
    ]);
    let directory = Arc::new(StaticActorDirectory::new(doctor()));
    let desk = system.consultation_desk(directory.clone());

    let queue = desk.in_queue().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, TestRequestId(7));

    desk.assign(TestRequestId(7)).await.unwrap();
    assert!(desk.in_queue().await.unwrap().is_empty());

    let mine = desk.assigned_to_me().await.unwrap();
    assert_eq!(mine.len(), 1);

    let done = desk
        .update(TestRequestId(7), ConsultationPayload::new("NO_ISSUES"))
        .await
        .unwrap();
    assert_eq!(done.status, RequestStatus::Completed);

    directory.sign_out();
    assert!(directory.current_actor().await.is_err());
    assert!(desk.assigned_to_me().await.is_err());
}

#[tokio::test]
async fn test_lab_desk_flow() {
    let (system, _store) = seeded_system(vec![request_in(3, RequestStatus::Created)]);
    let directory = Arc::new(StaticActorDirectory::new(tester()));
    let desk = system.lab_desk(directory.clone());

    assert_eq!(desk.in_queue().await.unwrap().len(), 1);

    desk.assign(TestRequestId(3)).await.unwrap();
    desk.start(TestRequestId(3)).await.unwrap();
    let completed = desk
        .update(TestRequestId(3), LabResultPayload::with_result("NEGATIVE"))
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::LabTestCompleted);
    assert_eq!(desk.assigned_to_me().await.unwrap().len(), 1);

    directory.sign_in(doctor());
    assert!(matches!(desk.in_queue().await, Err(WorkflowError::Unauthorized)));
}
