use testflow_core::models::Role;
use testflow_core::state_machine::guards::{rule_for, AssigneeRule, StateGuard};
use testflow_core::state_machine::RequestStatus;

use crate::common::fixtures::{admin, doctor, other_doctor, other_tester, request_in, tester};

#[test]
fn test_eligibility_table_roles() {
    let expectations = [
        (RequestStatus::Created, Role::Tester, AssigneeRule::Anyone),
        (RequestStatus::Initiated, Role::Tester, AssigneeRule::AssignedTechnician),
        (RequestStatus::LabTestInProgress, Role::Tester, AssigneeRule::AssignedTechnician),
        (RequestStatus::LabTestCompleted, Role::Doctor, AssigneeRule::Anyone),
        (RequestStatus::DiagnosisInProcess, Role::Doctor, AssigneeRule::AssignedDoctor),
    ];

    for (from, role, assignee) in expectations {
        let rule = rule_for(from).unwrap();
        assert_eq!(rule.required_role, role, "role for {from}");
        assert_eq!(rule.assignee, assignee, "assignee rule for {from}");
    }
}

#[test]
fn test_identity_guard_on_lab_side() {
    let request = request_in(1, RequestStatus::Initiated);
    let rule = rule_for(RequestStatus::Initiated).unwrap();

    assert!(rule.check(&request, &tester()).is_ok());
    assert!(rule.check(&request, &other_tester()).is_err());
    assert!(rule.check(&request, &doctor()).is_err());
}

#[test]
fn test_identity_guard_on_consultation_completion() {
    let request = request_in(1, RequestStatus::DiagnosisInProcess);
    let rule = rule_for(RequestStatus::DiagnosisInProcess).unwrap();

    assert!(rule.check(&request, &doctor()).is_ok());
    assert!(rule.check(&request, &other_doctor()).is_err());
    assert!(rule.check(&request, &admin()).is_err());
}

#[test]
fn test_any_doctor_may_take_consultation() {
    let request = request_in(1, RequestStatus::LabTestCompleted);
    let rule = rule_for(RequestStatus::LabTestCompleted).unwrap();

    assert!(rule.check(&request, &doctor()).is_ok());
    assert!(rule.check(&request, &other_doctor()).is_ok());
    assert!(rule.check(&request, &tester()).is_err());
}
