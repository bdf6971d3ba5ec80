//! Wiring of store, engine and services from a [`WorkflowConfig`].

use std::sync::Arc;
use tracing::info;

use crate::config::{StoreBackend, WorkflowConfig};
use crate::desk::{ConsultationDesk, LabDesk};
use crate::directory::ActorDirectory;
use crate::error::Result;
use crate::services::{RequestQueryService, RequestUpdateService};
use crate::state_machine::WorkflowEngine;
use crate::store::{InMemoryRequestStore, RequestStore};
use crate::validation::PayloadValidator;

/// Fully wired workflow core
#[derive(Clone)]
pub struct WorkflowSystem {
    store: Arc<dyn RequestStore>,
    queries: RequestQueryService,
    updates: RequestUpdateService,
}

impl WorkflowSystem {
    /// Build over an existing store
    pub fn with_store(store: Arc<dyn RequestStore>, config: &WorkflowConfig) -> Self {
        let engine = WorkflowEngine::new(PayloadValidator::new(&config.validation));
        Self {
            queries: RequestQueryService::new(Arc::clone(&store)),
            updates: RequestUpdateService::new(Arc::clone(&store), engine),
            store,
        }
    }

    pub fn in_memory(config: &WorkflowConfig) -> Self {
        Self::with_store(Arc::new(InMemoryRequestStore::new()), config)
    }

    /// Build with the store backend named in `config.store`
    pub async fn from_config(config: &WorkflowConfig) -> Result<Self> {
        match config.store.backend {
            StoreBackend::Memory => {
                info!("Using in-memory request store");
                Ok(Self::in_memory(config))
            }
            #[cfg(feature = "postgres")]
            StoreBackend::Postgres => {
                let store = crate::store::PgRequestStore::connect(&config.store).await?;
                store.migrate().await?;
                Ok(Self::with_store(Arc::new(store), config))
            }
            #[cfg(not(feature = "postgres"))]
            StoreBackend::Postgres => Err(crate::state_machine::errors::store_unavailable(
                "postgres backend requires the `postgres` feature",
            )
            .into()),
        }
    }

    pub fn store(&self) -> Arc<dyn RequestStore> {
        Arc::clone(&self.store)
    }

    pub fn queries(&self) -> &RequestQueryService {
        &self.queries
    }

    pub fn updates(&self) -> &RequestUpdateService {
        &self.updates
    }

    pub fn consultation_desk(&self, directory: Arc<dyn ActorDirectory>) -> ConsultationDesk {
        ConsultationDesk::new(directory, self.queries.clone(), self.updates.clone())
    }

    pub fn lab_desk(&self, directory: Arc<dyn ActorDirectory>) -> LabDesk {
        LabDesk::new(directory, self.queries.clone(), self.updates.clone())
    }
}
