use chrono::Utc;

use super::{
    context::TransitionContext,
    errors::{illegal_transition, invalid_payload, StateMachineResult},
    events::TransitionPayload,
    guards::{rule_for, StateGuard, TransitionRule},
    states::RequestStatus,
};
use crate::models::{Actor, Consultation, LabResult, TestRequest, TransitionRecord};
use crate::validation::{FieldViolation, PayloadValidator};

/// Pure decision engine for the test-request lifecycle.
///
/// Owns the legal state graph and payload rules but never touches storage.
#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    validator: PayloadValidator,
}

/// Outcome of applying an approved transition: the mutated request plus its
/// audit record, ready for a single compare-and-save.
#[derive(Debug, Clone)]
pub struct AppliedTransition {
    pub request: TestRequest,
    pub record: TransitionRecord,
}

/// A transition that passed legality and eligibility checks for one actor.
/// Consumed by [`ApprovedTransition::apply`].
#[derive(Debug)]
pub struct ApprovedTransition<'a> {
    engine: &'a WorkflowEngine,
    request: &'a TestRequest,
    actor: &'a Actor,
    rule: &'static TransitionRule,
}

impl WorkflowEngine {
    pub fn new(validator: PayloadValidator) -> Self {
        Self { validator }
    }

    /// Decide whether `actor` may move `request` to `target`.
    ///
    /// Legality is checked before eligibility, so replaying a transition that
    /// already happened reports `IllegalTransition` rather than `Unauthorized`.
    pub fn validate_transition<'a>(
        &'a self,
        request: &'a TestRequest,
        actor: &'a Actor,
        target: RequestStatus,
    ) -> StateMachineResult<ApprovedTransition<'a>> {
        let current = request.status;
        if !current.can_transition_to(target) {
            return Err(illegal_transition(current, target));
        }

        let rule = rule_for(current).ok_or_else(|| illegal_transition(current, target))?;
        rule.check(request, actor)?;

        Ok(ApprovedTransition {
            engine: self,
            request,
            actor,
            rule,
        })
    }

    fn expected_payload(target: RequestStatus) -> &'static str {
        match target {
            RequestStatus::LabTestCompleted => "lab_result",
            RequestStatus::Completed => "consultation",
            _ => "none",
        }
    }
}

impl ApprovedTransition<'_> {
    pub fn rule(&self) -> &'static TransitionRule {
        self.rule
    }

    /// Produce the updated request and its transition record
    pub fn apply(
        self,
        payload: TransitionPayload,
        context: TransitionContext,
    ) -> StateMachineResult<AppliedTransition> {
        let now = Utc::now();
        let actor_id = self.actor.id;
        let mut updated = self.request.clone();

        match (self.rule.to, payload) {
            (RequestStatus::Initiated, TransitionPayload::None) => {
                updated.assigned_lab_technician = Some(actor_id);
            }
            (RequestStatus::LabTestInProgress, TransitionPayload::None) => {}
            (RequestStatus::LabTestCompleted, TransitionPayload::LabResult(lab)) => {
                let violations = self.engine.validator.validate_lab_result(&lab);
                if !violations.is_empty() {
                    return Err(invalid_payload(violations));
                }
                updated.lab_result = Some(LabResult {
                    blood_pressure: lab.blood_pressure,
                    heart_beat: lab.heart_beat,
                    temperature: lab.temperature,
                    oxygen_level: lab.oxygen_level,
                    comments: lab.comments,
                    result: lab.result,
                    tester: actor_id,
                    updated_on: now,
                });
            }
            (RequestStatus::DiagnosisInProcess, TransitionPayload::None) => {
                updated.assigned_doctor = Some(actor_id);
            }
            (RequestStatus::Completed, TransitionPayload::Consultation(consultation)) => {
                let violations = self.engine.validator.validate_consultation(&consultation);
                if !violations.is_empty() {
                    return Err(invalid_payload(violations));
                }
                updated.consultation = Some(Consultation {
                    suggestion: consultation.suggestion,
                    comments: consultation.comments,
                    doctor: actor_id,
                    updated_on: now,
                });
            }
            (target, other) => {
                return Err(invalid_payload(vec![FieldViolation::new(
                    "payload",
                    format!(
                        "expected {} payload for transition to {target}, got {}",
                        WorkflowEngine::expected_payload(target),
                        other.kind()
                    ),
                )]));
            }
        }

        updated.status = self.rule.to;
        updated.updated_at = now;

        let record = TransitionRecord {
            request_id: updated.id,
            from_status: self.rule.from,
            to_status: self.rule.to,
            changed_by: actor_id,
            changed_by_role: self.actor.role,
            happened_on: now,
            correlation_id: context.correlation_id,
        };

        Ok(AppliedTransition {
            request: updated,
            record,
        })
    }
}
