//! # Work desks
//!
//! Role-gated entry points for doctors and lab technicians. A desk resolves
//! the caller through an [`ActorDirectory`](crate::directory::ActorDirectory),
//! rejects callers without the desk's role before touching the store, and
//! then delegates to the query and update services.

pub mod consultation;
pub mod lab;

pub use consultation::ConsultationDesk;
pub use lab::LabDesk;

use crate::error::{Result, WorkflowError};
use crate::models::{Actor, Role};

fn require_role(actor: Actor, role: Role) -> Result<Actor> {
    if actor.has_role(role) {
        Ok(actor)
    } else {
        tracing::warn!(
            actor_id = %actor.id,
            role = %actor.role,
            required = %role,
            "Desk access denied"
        );
        Err(WorkflowError::Unauthorized)
    }
}
