use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::actor::{Actor, ActorId};
use crate::state_machine::states::RequestStatus;

/// Identifier of a test request, assigned by the store at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestRequestId(pub i64);

impl fmt::Display for TestRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Patient details captured at intake. The workflow never mutates these.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
}

impl Patient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Lab measurements and outcome recorded by the assigned technician
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub blood_pressure: Option<String>,
    pub heart_beat: Option<String>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub comments: Option<String>,
    pub result: String,
    pub tester: ActorId,
    pub updated_on: DateTime<Utc>,
}

/// Doctor's conclusion on a completed lab test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub suggestion: String,
    pub comments: Option<String>,
    pub doctor: ActorId,
    pub updated_on: DateTime<Utc>,
}

/// A single patient test-tracking record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRequest {
    pub id: TestRequestId,
    pub status: RequestStatus,
    pub patient: Patient,
    pub assigned_lab_technician: Option<ActorId>,
    pub assigned_doctor: Option<ActorId>,
    pub lab_result: Option<LabResult>,
    pub consultation: Option<Consultation>,
    /// Opaque stamp for compare-and-save; bumped by the store on every write
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intake data for registering a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTestRequest {
    pub patient: Patient,
}

impl TestRequest {
    pub fn is_assigned_technician(&self, actor: &Actor) -> bool {
        self.assigned_lab_technician == Some(actor.id)
    }

    pub fn is_assigned_doctor(&self, actor: &Actor) -> bool {
        self.assigned_doctor == Some(actor.id)
    }

    /// Whether the optional fields populated match what `status` allows
    pub fn fields_match_status(&self) -> bool {
        let status = self.status;
        self.assigned_lab_technician.is_some() == (status >= RequestStatus::Initiated)
            && self.lab_result.is_some() == (status >= RequestStatus::LabTestCompleted)
            && self.assigned_doctor.is_some() == (status >= RequestStatus::DiagnosisInProcess)
            && self.consultation.is_some() == (status == RequestStatus::Completed)
    }
}
