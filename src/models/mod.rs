//! # Models
//!
//! Data carried through the test-request workflow: the request record itself,
//! the actors that move it along, and the audit trail of its transitions.

pub mod actor;
pub mod request_transition;
pub mod test_request;

pub use actor::{Actor, ActorId, Role};
pub use request_transition::TransitionRecord;
pub use test_request::{
    Consultation, LabResult, NewTestRequest, Patient, TestRequest, TestRequestId,
};
