//! Proptest strategies for workflow operation sequences

use proptest::prelude::*;

use testflow_core::models::Actor;

use super::fixtures::{admin, doctor, other_doctor, other_tester, tester};

/// One caller-side workflow operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AssignForLabTest,
    StartLabTest,
    UpdateLabTest { valid: bool },
    AssignForConsultation,
    UpdateConsultation { valid: bool },
}

/// Index into [`actor_pool`]
pub type ActorChoice = usize;

pub fn actor_pool() -> [Actor; 5] {
    [tester(), other_tester(), doctor(), other_doctor(), admin()]
}

pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::AssignForLabTest),
        Just(Operation::StartLabTest),
        any::<bool>().prop_map(|valid| Operation::UpdateLabTest { valid }),
        Just(Operation::AssignForConsultation),
        any::<bool>().prop_map(|valid| Operation::UpdateConsultation { valid }),
    ]
}

/// Sequences of (operation, acting actor) pairs
pub fn operation_sequence_strategy() -> impl Strategy<Value = Vec<(Operation, ActorChoice)>> {
    prop::collection::vec((operation_strategy(), 0..actor_pool().len()), 0..24)
}
