use testflow_core::models::TestRequestId;
use testflow_core::state_machine::errors::*;
use testflow_core::state_machine::RequestStatus;
use testflow_core::validation::FieldViolation;
use testflow_core::WorkflowError;

#[test]
fn test_error_chain() {
    let engine_err = invalid_payload(vec![
        FieldViolation::new("suggestion", "must not be empty"),
        FieldViolation::new("comments", "must be at most 10 characters (was 12)"),
    ]);
    let workflow_err: WorkflowError = engine_err.into();

    match &workflow_err {
        WorkflowError::InvalidPayload { violations } => {
            assert_eq!(violations.len(), 2);
        }
        other => panic!("Expected InvalidPayload error, got {other:?}"),
    }
    assert_eq!(workflow_err.violations().len(), 2);
    assert!(workflow_err.is_client_error());
}

#[test]
fn test_error_messages() {
    let err = PersistenceError::NotFound {
        request_id: TestRequestId(123),
    };
    assert_eq!(err.to_string(), "Test request 123 not found");

    let err = illegal_transition(RequestStatus::Created, RequestStatus::Completed);
    assert_eq!(
        err.to_string(),
        "Invalid state transition from CREATED to COMPLETED"
    );

    let err: WorkflowError = invalid_payload(vec![FieldViolation::new(
        "result",
        "must not be empty",
    )])
    .into();
    assert_eq!(err.to_string(), "Invalid payload: result: must not be empty");
}

#[test]
fn test_not_found_survives_conversion() {
    let err: WorkflowError = PersistenceError::NotFound {
        request_id: TestRequestId(7),
    }
    .into();

    assert!(matches!(
        err,
        WorkflowError::NotFound { request_id } if request_id == TestRequestId(7)
    ));
    assert!(!err.is_retryable());
}
