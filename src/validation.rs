//! Payload validation for workflow transitions
//!
//! Validators collect every violation in a payload rather than stopping at the
//! first, so a caller can fix a rejected form in one round trip.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ValidationConfig;
use crate::state_machine::events::{ConsultationPayload, LabResultPayload};

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Render a violation list as `field: message; field: message`
pub fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks transition payloads against the configured limits
#[derive(Debug, Clone)]
pub struct PayloadValidator {
    max_comment_length: usize,
}

impl Default for PayloadValidator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl PayloadValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            max_comment_length: config.max_comment_length,
        }
    }

    /// Lab result must carry a non-blank outcome
    pub fn validate_lab_result(&self, payload: &LabResultPayload) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        require_non_blank(&mut violations, "result", &payload.result);
        self.check_comments(&mut violations, payload.comments.as_deref());

        violations
    }

    /// Consultation must carry a non-blank suggestion
    pub fn validate_consultation(&self, payload: &ConsultationPayload) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        require_non_blank(&mut violations, "suggestion", &payload.suggestion);
        self.check_comments(&mut violations, payload.comments.as_deref());

        violations
    }

    fn check_comments(&self, violations: &mut Vec<FieldViolation>, comments: Option<&str>) {
        if let Some(comments) = comments {
            let length = comments.chars().count();
            if length > self.max_comment_length {
                violations.push(FieldViolation::new(
                    "comments",
                    format!(
                        "must be at most {} characters (was {length})",
                        self.max_comment_length
                    ),
                ));
            }
        }
    }
}

fn require_non_blank(violations: &mut Vec<FieldViolation>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(FieldViolation::new(field, "must not be empty"));
    }
}
