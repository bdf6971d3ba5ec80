use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::actor::{ActorId, Role};
use super::test_request::TestRequestId;
use crate::state_machine::states::RequestStatus;

/// Audit entry for one committed status change.
///
/// Written in the same compare-and-save as the request it describes, so the
/// flow history never disagrees with the stored status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub request_id: TestRequestId,
    pub from_status: RequestStatus,
    pub to_status: RequestStatus,
    pub changed_by: ActorId,
    pub changed_by_role: Role,
    pub happened_on: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl TransitionRecord {
    /// JSON metadata persisted alongside the row
    pub fn metadata(&self) -> serde_json::Value {
        let mut metadata = serde_json::json!({
            "event": format!("{}->{}", self.from_status, self.to_status),
            "role": self.changed_by_role,
        });
        if let (Some(correlation_id), serde_json::Value::Object(map)) =
            (self.correlation_id, &mut metadata)
        {
            map.insert(
                "correlation_id".to_string(),
                serde_json::Value::String(correlation_id.to_string()),
            );
        }
        metadata
    }
}
