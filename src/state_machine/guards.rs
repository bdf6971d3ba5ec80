use super::errors::{StateMachineError, StateMachineResult};
use super::states::RequestStatus;
use crate::models::{Actor, Role, TestRequest};

/// Trait for implementing state transition guards
pub trait StateGuard<T> {
    /// Check if `actor` may move `entity` along this transition
    fn check(&self, entity: &T, actor: &Actor) -> StateMachineResult<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Identity requirement layered on top of the role check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeRule {
    /// Any actor holding the role
    Anyone,
    /// Only the technician the request is assigned to
    AssignedTechnician,
    /// Only the doctor the request is assigned to
    AssignedDoctor,
}

impl AssigneeRule {
    pub fn permits(&self, request: &TestRequest, actor: &Actor) -> bool {
        match self {
            Self::Anyone => true,
            Self::AssignedTechnician => request.is_assigned_technician(actor),
            Self::AssignedDoctor => request.is_assigned_doctor(actor),
        }
    }
}

/// One row of the eligibility table: who may move a request from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub required_role: Role,
    pub assignee: AssigneeRule,
    description: &'static str,
}

/// Every legal transition. Anything not listed here is illegal.
pub static TRANSITION_RULES: [TransitionRule; 5] = [
    TransitionRule {
        from: RequestStatus::Created,
        to: RequestStatus::Initiated,
        required_role: Role::Tester,
        assignee: AssigneeRule::Anyone,
        description: "Any tester may claim a new request for lab testing",
    },
    TransitionRule {
        from: RequestStatus::Initiated,
        to: RequestStatus::LabTestInProgress,
        required_role: Role::Tester,
        assignee: AssigneeRule::AssignedTechnician,
        description: "Only the assigned technician may start the lab test",
    },
    TransitionRule {
        from: RequestStatus::LabTestInProgress,
        to: RequestStatus::LabTestCompleted,
        required_role: Role::Tester,
        assignee: AssigneeRule::AssignedTechnician,
        description: "Only the assigned technician may record the lab result",
    },
    TransitionRule {
        from: RequestStatus::LabTestCompleted,
        to: RequestStatus::DiagnosisInProcess,
        required_role: Role::Doctor,
        assignee: AssigneeRule::Anyone,
        description: "Any doctor may take a completed lab test for consultation",
    },
    TransitionRule {
        from: RequestStatus::DiagnosisInProcess,
        to: RequestStatus::Completed,
        required_role: Role::Doctor,
        assignee: AssigneeRule::AssignedDoctor,
        description: "Only the assigned doctor may complete the consultation",
    },
];

/// Look up the rule governing the transition out of `from`
pub fn rule_for(from: RequestStatus) -> Option<&'static TransitionRule> {
    TRANSITION_RULES.iter().find(|rule| rule.from == from)
}

impl StateGuard<TestRequest> for TransitionRule {
    fn check(&self, request: &TestRequest, actor: &Actor) -> StateMachineResult<()> {
        if actor.has_role(self.required_role) && self.assignee.permits(request, actor) {
            Ok(())
        } else {
            Err(StateMachineError::Unauthorized)
        }
    }

    fn description(&self) -> &'static str {
        self.description
    }
}
