use testflow_core::models::{ActorId, Role, TestRequestId};
use testflow_core::state_machine::{ConsultationPayload, RequestStatus};
use testflow_core::WorkflowError;

use crate::common::fixtures::{
    admin, doctor, other_doctor, request_in, seeded_system, tester, DOCTOR_ID,
};

#[tokio::test]
async fn test_doctor_takes_and_completes_consultation() {
    let (system, _store) = seeded_system(vec![request_in(42, RequestStatus::LabTestCompleted)]);
    let id = TestRequestId(42);

    let assigned = system
        .updates()
        .assign_for_consultation(id, &doctor())
        .await
        .unwrap();
    assert_eq!(assigned.status, RequestStatus::DiagnosisInProcess);
    assert_eq!(assigned.assigned_doctor, Some(ActorId(DOCTOR_ID)));
    assert_eq!(assigned.version, 1);

    let completed = system
        .updates()
        .update_consultation(
            id,
            ConsultationPayload::new("SELF_ISOLATE").with_comments("Retest in 5 days"),
            &doctor(),
        )
        .await
        .unwrap();
    assert_eq!(completed.status, RequestStatus::Completed);
    assert_eq!(completed.version, 2);

    let consultation = completed.consultation.unwrap();
    assert_eq!(consultation.suggestion, "SELF_ISOLATE");
    assert_eq!(consultation.comments.as_deref(), Some("Retest in 5 days"));
    assert_eq!(consultation.doctor, ActorId(DOCTOR_ID));

    let history = system.queries().history(id).await.unwrap();
    let steps: Vec<(RequestStatus, RequestStatus)> = history
        .iter()
        .map(|r| (r.from_status, r.to_status))
        .collect();
    assert_eq!(
        steps,
        vec![
            (RequestStatus::LabTestCompleted, RequestStatus::DiagnosisInProcess),
            (RequestStatus::DiagnosisInProcess, RequestStatus::Completed),
        ]
    );
    assert!(history.iter().all(|r| r.changed_by_role == Role::Doctor));
}

#[tokio::test]
async fn test_other_doctor_cannot_complete() {
    let (system, _store) = seeded_system(vec![request_in(42, RequestStatus::DiagnosisInProcess)]);
    let id = TestRequestId(42);

    let err = system
        .updates()
        .update_consultation(id, ConsultationPayload::new("NEGATIVE"), &other_doctor())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthorized));

    let unchanged = system.queries().find_by_id(id).await.unwrap();
    assert_eq!(unchanged.status, RequestStatus::DiagnosisInProcess);
    assert_eq!(unchanged.version, 0);
    assert!(system.queries().history(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_consultation_before_lab_completion_is_illegal() {
    let (system, _store) = seeded_system(vec![request_in(42, RequestStatus::LabTestInProgress)]);

    let err = system
        .updates()
        .assign_for_consultation(TestRequestId(42), &doctor())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::IllegalTransition {
            current: RequestStatus::LabTestInProgress,
            attempted: RequestStatus::DiagnosisInProcess,
        }
    ));
}

#[tokio::test]
async fn test_repeated_assignment_is_illegal_not_idempotent() {
    let (system, _store) = seeded_system(vec![request_in(42, RequestStatus::LabTestCompleted)]);
    let id = TestRequestId(42);

    system
        .updates()
        .assign_for_consultation(id, &doctor())
        .await
        .unwrap();
    let err = system
        .updates()
        .assign_for_consultation(id, &doctor())
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::IllegalTransition { .. }));
    assert_eq!(system.queries().history(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_repeated_update_without_reload_is_illegal() {
    let (system, _store) = seeded_system(vec![request_in(42, RequestStatus::DiagnosisInProcess)]);
    let id = TestRequestId(42);
    let payload = ConsultationPayload::new("NO_ISSUES");

    system
        .updates()
        .update_consultation(id, payload.clone(), &doctor())
        .await
        .unwrap();
    let err = system
        .updates()
        .update_consultation(id, payload, &doctor())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::IllegalTransition {
            current: RequestStatus::Completed,
            attempted: RequestStatus::Completed,
        }
    ));
    assert_eq!(system.queries().find_by_id(id).await.unwrap().version, 1);
}

#[tokio::test]
async fn test_blank_suggestion_rejected_without_side_effects() {
    let (system, _store) = seeded_system(vec![request_in(42, RequestStatus::DiagnosisInProcess)]);
    let id = TestRequestId(42);

    let err = system
        .updates()
        .update_consultation(id, ConsultationPayload::new("  "), &doctor())
        .await
        .unwrap_err();

    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].field, "suggestion");
    let unchanged = system.queries().find_by_id(id).await.unwrap();
    assert!(unchanged.consultation.is_none());
    assert_eq!(unchanged.version, 0);
}

#[tokio::test]
async fn test_only_doctors_move_consultation_states() {
    for status in RequestStatus::ALL {
        for actor in [tester(), admin()] {
            let (system, _store) = seeded_system(vec![request_in(1, status)]);
            let id = TestRequestId(1);

            let assign = system.updates().assign_for_consultation(id, &actor).await;
            let complete = system
                .updates()
                .update_consultation(id, ConsultationPayload::new("NO_ISSUES"), &actor)
                .await;

            assert!(assign.is_err(), "{} assigned consultation from {status}", actor.role);
            assert!(complete.is_err(), "{} completed consultation from {status}", actor.role);
        }
    }
}

#[tokio::test]
async fn test_assign_succeeds_iff_lab_test_completed() {
    for status in RequestStatus::ALL {
        let (system, _store) = seeded_system(vec![request_in(1, status)]);
        let result = system
            .updates()
            .assign_for_consultation(TestRequestId(1), &other_doctor())
            .await;

        assert_eq!(
            result.is_ok(),
            status == RequestStatus::LabTestCompleted,
            "assign_for_consultation from {status}"
        );
    }
}

#[tokio::test]
async fn test_doctor_queue_queries() {
    let (system, _store) = seeded_system(vec![
        request_in(3, RequestStatus::LabTestCompleted),
        request_in(1, RequestStatus::LabTestCompleted),
        request_in(2, RequestStatus::DiagnosisInProcess),
        request_in(4, RequestStatus::Completed),
    ]);

    let waiting = system
        .queries()
        .find_by_status(RequestStatus::LabTestCompleted)
        .await
        .unwrap();
    let ids: Vec<i64> = waiting.iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![1, 3]);

    let mine = system
        .queries()
        .find_by_assigned_doctor(&doctor())
        .await
        .unwrap();
    let ids: Vec<i64> = mine.iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![2, 4]);

    assert!(system
        .queries()
        .find_by_assigned_doctor(&other_doctor())
        .await
        .unwrap()
        .is_empty());
}
