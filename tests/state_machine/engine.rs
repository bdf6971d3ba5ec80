use testflow_core::config::ValidationConfig;
use testflow_core::models::ActorId;
use testflow_core::state_machine::{
    ConsultationPayload, LabResultPayload, RequestStatus, StateMachineError, TransitionContext,
    TransitionPayload, WorkflowEngine,
};
use testflow_core::validation::PayloadValidator;

use crate::common::fixtures::{admin, doctor, other_doctor, request_in, tester};

#[test]
fn test_only_successor_is_reachable() {
    let engine = WorkflowEngine::default();

    for status in RequestStatus::ALL {
        let request = request_in(1, status);
        for target in RequestStatus::ALL {
            if status.next() == Some(target) {
                continue;
            }
            for actor in [tester(), doctor(), admin()] {
                let err = engine
                    .validate_transition(&request, &actor, target)
                    .unwrap_err();
                assert_eq!(
                    err,
                    StateMachineError::IllegalTransition {
                        from: status,
                        to: target,
                    }
                );
            }
        }
    }
}

#[test]
fn test_full_chain_preserves_field_invariant() {
    let engine = WorkflowEngine::default();
    let mut request = request_in(1, RequestStatus::Created);

    let steps: Vec<(RequestStatus, _, TransitionPayload)> = vec![
        (RequestStatus::Initiated, tester(), TransitionPayload::None),
        (RequestStatus::LabTestInProgress, tester(), TransitionPayload::None),
        (
            RequestStatus::LabTestCompleted,
            tester(),
            LabResultPayload::with_result("POSITIVE").into(),
        ),
        (RequestStatus::DiagnosisInProcess, doctor(), TransitionPayload::None),
        (
            RequestStatus::Completed,
            doctor(),
            ConsultationPayload::new("SELF_ISOLATE").into(),
        ),
    ];

    for (target, actor, payload) in steps {
        let applied = engine
            .validate_transition(&request, &actor, target)
            .unwrap()
            .apply(payload, TransitionContext::default())
            .unwrap();
        assert_eq!(applied.request.status, target);
        assert!(applied.request.fields_match_status(), "invariant broken at {target}");
        request = applied.request;
    }

    assert_eq!(request.assigned_doctor, Some(ActorId(1)));
    assert_eq!(request.lab_result.unwrap().result, "POSITIVE");
}

#[test]
fn test_unassigned_doctor_cannot_complete() {
    let engine = WorkflowEngine::default();
    let request = request_in(42, RequestStatus::DiagnosisInProcess);

    let err = engine
        .validate_transition(&request, &other_doctor(), RequestStatus::Completed)
        .unwrap_err();
    assert_eq!(err, StateMachineError::Unauthorized);
}

#[test]
fn test_payload_violations_collected_together() {
    let engine = WorkflowEngine::new(PayloadValidator::new(&ValidationConfig {
        max_comment_length: 5,
    }));
    let request = request_in(42, RequestStatus::DiagnosisInProcess);

    let err = engine
        .validate_transition(&request, &doctor(), RequestStatus::Completed)
        .unwrap()
        .apply(
            ConsultationPayload::new("").with_comments("far too long").into(),
            TransitionContext::default(),
        )
        .unwrap_err();

    match err {
        StateMachineError::InvalidPayload { violations } => {
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, vec!["suggestion", "comments"]);
        }
        other => panic!("Expected InvalidPayload, got {other:?}"),
    }
}

#[test]
fn test_missing_lab_payload_rejected() {
    let engine = WorkflowEngine::default();
    let request = request_in(3, RequestStatus::LabTestInProgress);

    let err = engine
        .validate_transition(&request, &tester(), RequestStatus::LabTestCompleted)
        .unwrap()
        .apply(TransitionPayload::None, TransitionContext::default())
        .unwrap_err();

    assert!(matches!(err, StateMachineError::InvalidPayload { .. }));
}
