use serde::{Deserialize, Serialize};

/// Lab measurements submitted when a technician completes a test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabResultPayload {
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub heart_beat: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub oxygen_level: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub result: String,
}

impl LabResultPayload {
    pub fn with_result(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            ..Self::default()
        }
    }
}

/// Doctor's consultation submitted to close out a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationPayload {
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub comments: Option<String>,
}

impl ConsultationPayload {
    pub fn new(suggestion: impl Into<String>) -> Self {
        Self {
            suggestion: suggestion.into(),
            comments: None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Data attached to a transition. Assignment and start transitions carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TransitionPayload {
    None,
    LabResult(LabResultPayload),
    Consultation(ConsultationPayload),
}

impl TransitionPayload {
    /// Get a string representation of the payload kind for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LabResult(_) => "lab_result",
            Self::Consultation(_) => "consultation",
        }
    }
}

impl From<LabResultPayload> for TransitionPayload {
    fn from(payload: LabResultPayload) -> Self {
        Self::LabResult(payload)
    }
}

impl From<ConsultationPayload> for TransitionPayload {
    fn from(payload: ConsultationPayload) -> Self {
        Self::Consultation(payload)
    }
}
