//! # Transition Context
//!
//! Attribution data threaded through an update call and stamped onto the
//! resulting [`TransitionRecord`](crate::models::TransitionRecord).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context data passed to workflow transitions for audit enrichment.
///
/// # Examples
///
/// ```rust
/// use testflow_core::state_machine::TransitionContext;
/// use uuid::Uuid;
///
/// let correlation_id = Uuid::new_v4();
/// let context = TransitionContext::with_correlation_id(correlation_id);
/// assert_eq!(context.correlation_id, Some(correlation_id));
///
/// let empty = TransitionContext::default();
/// assert!(!empty.has_attribution());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionContext {
    /// Links this transition to the originating request across service boundaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl TransitionContext {
    #[must_use]
    pub fn with_correlation_id(correlation_id: Uuid) -> Self {
        Self {
            correlation_id: Some(correlation_id),
        }
    }

    /// Context with a freshly generated correlation id
    #[must_use]
    pub fn correlated() -> Self {
        Self::with_correlation_id(Uuid::new_v4())
    }

    #[must_use]
    pub fn has_attribution(&self) -> bool {
        self.correlation_id.is_some()
    }
}
