use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

use super::{AssigneeSlot, RequestStore};
use crate::models::{ActorId, NewTestRequest, TestRequest, TestRequestId, TransitionRecord};
use crate::state_machine::errors::{PersistenceError, PersistenceResult};
use crate::state_machine::states::RequestStatus;

#[derive(Debug, Clone)]
struct StoredRequest {
    request: TestRequest,
    transitions: Vec<TransitionRecord>,
}

/// `DashMap`-backed store. Each compare-and-save runs under the entry's shard
/// lock, so a request and its history are always updated together.
#[derive(Debug)]
pub struct InMemoryRequestStore {
    records: DashMap<TestRequestId, StoredRequest>,
    last_id: AtomicI64,
}

impl Default for InMemoryRequestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            last_id: AtomicI64::new(0),
        }
    }

    /// Place a fully formed record in the store, replacing any existing one.
    /// Intended for fixtures that need a request mid-workflow.
    pub fn seed(&self, request: TestRequest) {
        self.last_id.fetch_max(request.id.0, Ordering::SeqCst);
        self.records.insert(
            request.id,
            StoredRequest {
                request,
                transitions: Vec::new(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn collect_sorted<F>(&self, predicate: F) -> Vec<TestRequest>
    where
        F: Fn(&TestRequest) -> bool,
    {
        let mut matching: Vec<TestRequest> = self
            .records
            .iter()
            .filter(|entry| predicate(&entry.request))
            .map(|entry| entry.request.clone())
            .collect();
        matching.sort_by_key(|request| request.id);
        matching
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn insert(&self, new_request: NewTestRequest) -> PersistenceResult<TestRequest> {
        let id = TestRequestId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let now = Utc::now();
        let request = TestRequest {
            id,
            status: RequestStatus::Created,
            patient: new_request.patient,
            assigned_lab_technician: None,
            assigned_doctor: None,
            lab_result: None,
            consultation: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        self.records.insert(
            id,
            StoredRequest {
                request: request.clone(),
                transitions: Vec::new(),
            },
        );
        debug!(request_id = %id, "Registered test request");
        Ok(request)
    }

    async fn load(&self, id: TestRequestId) -> PersistenceResult<TestRequest> {
        self.records
            .get(&id)
            .map(|entry| entry.request.clone())
            .ok_or(PersistenceError::NotFound { request_id: id })
    }

    async fn compare_and_save(
        &self,
        request: &TestRequest,
        expected_version: i64,
        transition: &TransitionRecord,
    ) -> PersistenceResult<TestRequest> {
        let mut entry = self
            .records
            .get_mut(&request.id)
            .ok_or(PersistenceError::NotFound {
                request_id: request.id,
            })?;

        let actual = entry.request.version;
        if actual != expected_version {
            return Err(PersistenceError::VersionConflict {
                request_id: request.id,
                expected: expected_version,
                actual,
            });
        }

        let mut saved = request.clone();
        saved.version = expected_version + 1;
        entry.request = saved.clone();
        entry.transitions.push(transition.clone());

        Ok(saved)
    }

    async fn query_by_status(&self, status: RequestStatus) -> PersistenceResult<Vec<TestRequest>> {
        Ok(self.collect_sorted(|request| request.status == status))
    }

    async fn query_by_assignee(
        &self,
        actor: ActorId,
        slot: AssigneeSlot,
    ) -> PersistenceResult<Vec<TestRequest>> {
        Ok(self.collect_sorted(|request| slot.matches(request, actor)))
    }

    async fn load_transitions(
        &self,
        id: TestRequestId,
    ) -> PersistenceResult<Vec<TransitionRecord>> {
        self.records
            .get(&id)
            .map(|entry| entry.transitions.clone())
            .ok_or(PersistenceError::NotFound { request_id: id })
    }
}
