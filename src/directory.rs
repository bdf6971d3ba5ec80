//! Actor directory: resolves who is acting at the boundary.
//!
//! The workflow services never call this themselves; the acting [`Actor`] is
//! always an explicit argument. Desks use it to resolve the caller once per
//! operation.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Result, WorkflowError};
use crate::models::Actor;

#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// The actor behind the current call, `Unauthorized` if nobody is signed in
    async fn current_actor(&self) -> Result<Actor>;
}

/// Directory holding a single, swappable signed-in actor
#[derive(Debug, Default)]
pub struct StaticActorDirectory {
    current: RwLock<Option<Actor>>,
}

impl StaticActorDirectory {
    pub fn new(actor: Actor) -> Self {
        Self {
            current: RwLock::new(Some(actor)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, actor: Actor) {
        *self.current.write() = Some(actor);
    }

    pub fn sign_out(&self) {
        *self.current.write() = None;
    }
}

#[async_trait]
impl ActorDirectory for StaticActorDirectory {
    async fn current_actor(&self) -> Result<Actor> {
        let current = self.current.read().clone();
        current.ok_or(WorkflowError::Unauthorized)
    }
}
