use thiserror::Error;

use super::states::RequestStatus;
use crate::models::TestRequestId;
use crate::validation::{join_violations, FieldViolation};

/// Reasons the workflow engine rejects a transition attempt
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateMachineError {
    #[error("Invalid state transition from {from} to {to}")]
    IllegalTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    /// Deliberately carries no detail about which rule failed
    #[error("Actor is not permitted to perform this transition")]
    Unauthorized,

    #[error("Invalid transition payload: {}", join_violations(.violations))]
    InvalidPayload { violations: Vec<FieldViolation> },
}

/// Failures reported by a request store
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Test request {request_id} not found")]
    NotFound { request_id: TestRequestId },

    #[error("Version conflict for test request {request_id}: expected {expected}, found {actual}")]
    VersionConflict {
        request_id: TestRequestId,
        expected: i64,
        actual: i64,
    },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Invalid stored data in {field}: {reason}")]
    InvalidStoredData { field: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Helper to build an illegal-transition error
pub fn illegal_transition(from: RequestStatus, to: RequestStatus) -> StateMachineError {
    StateMachineError::IllegalTransition { from, to }
}

/// Helper to build a payload error from collected violations
pub fn invalid_payload(violations: Vec<FieldViolation>) -> StateMachineError {
    StateMachineError::InvalidPayload { violations }
}

/// Helper to build a store-unavailable error
pub fn store_unavailable(reason: impl Into<String>) -> PersistenceError {
    PersistenceError::Unavailable {
        reason: reason.into(),
    }
}
