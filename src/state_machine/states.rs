use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a test request.
///
/// Variants are declared in chain order, so the derived `Ord` matches how far
/// a request has progressed through the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Registered by intake, not yet picked up by a lab technician
    Created,
    /// Claimed by a lab technician
    Initiated,
    /// Sample is being tested
    LabTestInProgress,
    /// Lab result recorded, waiting for a doctor
    LabTestCompleted,
    /// Doctor is reviewing the lab result
    DiagnosisInProcess,
    /// Consultation recorded; no further transitions
    Completed,
}

impl RequestStatus {
    /// Every status in chain order
    pub const ALL: [RequestStatus; 6] = [
        Self::Created,
        Self::Initiated,
        Self::LabTestInProgress,
        Self::LabTestCompleted,
        Self::DiagnosisInProcess,
        Self::Completed,
    ];

    /// The single legal successor of this status, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::Initiated),
            Self::Initiated => Some(Self::LabTestInProgress),
            Self::LabTestInProgress => Some(Self::LabTestCompleted),
            Self::LabTestCompleted => Some(Self::DiagnosisInProcess),
            Self::DiagnosisInProcess => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check if the lab half of the workflow is still running
    pub fn is_lab_phase(&self) -> bool {
        matches!(self, Self::Initiated | Self::LabTestInProgress)
    }

    /// Check if a doctor is actively working on the request
    pub fn is_consultation_phase(&self) -> bool {
        matches!(self, Self::DiagnosisInProcess)
    }

    /// Whether `target` is the one status reachable from here
    pub fn can_transition_to(&self, target: RequestStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Initiated => "INITIATED",
            Self::LabTestInProgress => "LAB_TEST_IN_PROGRESS",
            Self::LabTestCompleted => "LAB_TEST_COMPLETED",
            Self::DiagnosisInProcess => "DIAGNOSIS_IN_PROCESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "INITIATED" => Ok(Self::Initiated),
            "LAB_TEST_IN_PROGRESS" => Ok(Self::LabTestInProgress),
            "LAB_TEST_COMPLETED" => Ok(Self::LabTestCompleted),
            "DIAGNOSIS_IN_PROCESS" => Ok(Self::DiagnosisInProcess),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("Invalid request status: {s}")),
        }
    }
}

/// Default status for newly registered requests
impl Default for RequestStatus {
    fn default() -> Self {
        Self::Created
    }
}
