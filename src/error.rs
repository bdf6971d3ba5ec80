use thiserror::Error;

use crate::models::TestRequestId;
use crate::state_machine::errors::{PersistenceError, StateMachineError};
use crate::state_machine::states::RequestStatus;
use crate::validation::{join_violations, FieldViolation};

/// Errors surfaced to callers of the workflow services
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Test request {request_id} not found")]
    NotFound { request_id: TestRequestId },

    #[error("Illegal transition: request is {current}, cannot move to {attempted}")]
    IllegalTransition {
        current: RequestStatus,
        attempted: RequestStatus,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid payload: {}", join_violations(.violations))]
    InvalidPayload { violations: Vec<FieldViolation> },

    #[error("Test request {request_id} was modified concurrently; reload and retry")]
    ConcurrentModification { request_id: TestRequestId },

    #[error("Request store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}

impl WorkflowError {
    /// Errors caused by the caller's request rather than by the system
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::StoreUnavailable { .. })
    }

    /// Only a lost compare-and-save is worth retrying from a fresh load
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Violations carried by an `InvalidPayload`, empty otherwise
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::InvalidPayload { violations } => violations,
            _ => &[],
        }
    }
}

impl From<StateMachineError> for WorkflowError {
    fn from(err: StateMachineError) -> Self {
        match err {
            StateMachineError::IllegalTransition { from, to } => Self::IllegalTransition {
                current: from,
                attempted: to,
            },
            StateMachineError::Unauthorized => Self::Unauthorized,
            StateMachineError::InvalidPayload { violations } => Self::InvalidPayload { violations },
        }
    }
}

impl From<PersistenceError> for WorkflowError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { request_id } => Self::NotFound { request_id },
            PersistenceError::VersionConflict { request_id, .. } => {
                Self::ConcurrentModification { request_id }
            }
            other => Self::StoreUnavailable {
                reason: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
