// State machine module for the test-request workflow
//
// Legal states, the role/identity eligibility table, payload application and
// the error types the engine reports. Everything here is pure; storage lives
// in `crate::store`.

pub mod context;
pub mod errors;
pub mod events;
pub mod guards;
pub mod request_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use context::TransitionContext;
pub use errors::{PersistenceError, StateMachineError};
pub use events::{ConsultationPayload, LabResultPayload, TransitionPayload};
pub use request_state_machine::{AppliedTransition, ApprovedTransition, WorkflowEngine};
pub use states::RequestStatus;

// Common traits and utilities
pub use guards::{AssigneeRule, StateGuard, TransitionRule, TRANSITION_RULES};
