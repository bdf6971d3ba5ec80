use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future;
use futures::TryStreamExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Encode, FromRow, PgPool, Postgres, Type};
use tracing::{debug, info};
use uuid::Uuid;

use super::{AssigneeSlot, RequestStore};
use crate::config::StoreConfig;
use crate::models::{
    ActorId, Consultation, LabResult, NewTestRequest, Patient, Role, TestRequest, TestRequestId,
    TransitionRecord,
};
use crate::state_machine::errors::{store_unavailable, PersistenceError, PersistenceResult};
use crate::state_machine::states::RequestStatus;

const REQUEST_COLUMNS: &str = "id, status, patient, assigned_lab_technician, assigned_doctor, \
     lab_result, consultation, version, created_at, updated_at";

/// Row shape of `test_requests`
#[derive(Debug, FromRow)]
struct TestRequestRow {
    id: i64,
    status: String,
    patient: Json<Patient>,
    assigned_lab_technician: Option<i64>,
    assigned_doctor: Option<i64>,
    lab_result: Option<Json<LabResult>>,
    consultation: Option<Json<Consultation>>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TestRequestRow> for TestRequest {
    type Error = PersistenceError;

    fn try_from(row: TestRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<RequestStatus>()
            .map_err(|reason| PersistenceError::InvalidStoredData {
                field: "test_requests.status".to_string(),
                reason,
            })?;

        Ok(TestRequest {
            id: TestRequestId(row.id),
            status,
            patient: row.patient.0,
            assigned_lab_technician: row.assigned_lab_technician.map(ActorId),
            assigned_doctor: row.assigned_doctor.map(ActorId),
            lab_result: row.lab_result.map(|json| json.0),
            consultation: row.consultation.map(|json| json.0),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row shape of `test_request_transitions`
#[derive(Debug, FromRow)]
struct TransitionRow {
    request_id: i64,
    from_status: String,
    to_status: String,
    changed_by: i64,
    changed_by_role: String,
    happened_on: DateTime<Utc>,
    correlation_id: Option<Uuid>,
}

impl TryFrom<TransitionRow> for TransitionRecord {
    type Error = PersistenceError;

    fn try_from(row: TransitionRow) -> Result<Self, Self::Error> {
        let invalid = |field: &str, reason: String| PersistenceError::InvalidStoredData {
            field: format!("test_request_transitions.{field}"),
            reason,
        };

        Ok(TransitionRecord {
            request_id: TestRequestId(row.request_id),
            from_status: row
                .from_status
                .parse()
                .map_err(|reason| invalid("from_status", reason))?,
            to_status: row
                .to_status
                .parse()
                .map_err(|reason| invalid("to_status", reason))?,
            changed_by: ActorId(row.changed_by),
            changed_by_role: row
                .changed_by_role
                .parse::<Role>()
                .map_err(|reason| invalid("changed_by_role", reason))?,
            happened_on: row.happened_on,
            correlation_id: row.correlation_id,
        })
    }
}

/// Postgres-backed request store
#[derive(Debug, Clone)]
pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from the store configuration
    pub async fn connect(config: &StoreConfig) -> PersistenceResult<Self> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| store_unavailable("store.database_url is not configured"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(database_url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Connected Postgres request store"
        );
        Ok(Self { pool })
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> PersistenceResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| store_unavailable(format!("Migration failed: {e}")))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Stream matching rows, converting each as it arrives
    async fn fetch_requests<'q, B>(
        &self,
        sql: &'q str,
        bind: B,
    ) -> PersistenceResult<Vec<TestRequest>>
    where
        B: 'q + Send + Encode<'q, Postgres> + Type<Postgres>,
    {
        sqlx::query_as::<_, TestRequestRow>(sql)
            .bind(bind)
            .fetch(&self.pool)
            .map_err(PersistenceError::from)
            .and_then(|row| future::ready(TestRequest::try_from(row)))
            .try_collect()
            .await
    }
}

#[async_trait]
impl RequestStore for PgRequestStore {
    async fn insert(&self, new_request: NewTestRequest) -> PersistenceResult<TestRequest> {
        let sql = format!(
            "INSERT INTO test_requests (status, patient, version) \
             VALUES ($1, $2, 0) RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TestRequestRow>(&sql)
            .bind(RequestStatus::Created.as_str())
            .bind(Json(&new_request.patient))
            .fetch_one(&self.pool)
            .await?;

        debug!(request_id = row.id, "Registered test request");
        row.try_into()
    }

    async fn load(&self, id: TestRequestId) -> PersistenceResult<TestRequest> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM test_requests WHERE id = $1");
        sqlx::query_as::<_, TestRequestRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PersistenceError::NotFound { request_id: id })?
            .try_into()
    }

    async fn compare_and_save(
        &self,
        request: &TestRequest,
        expected_version: i64,
        transition: &TransitionRecord,
    ) -> PersistenceResult<TestRequest> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE test_requests \
             SET status = $3, assigned_lab_technician = $4, assigned_doctor = $5, \
                 lab_result = $6, consultation = $7, updated_at = $8, version = version + 1 \
             WHERE id = $1 AND version = $2 \
             RETURNING {REQUEST_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, TestRequestRow>(&sql)
            .bind(request.id.0)
            .bind(expected_version)
            .bind(request.status.as_str())
            .bind(request.assigned_lab_technician.map(|actor| actor.0))
            .bind(request.assigned_doctor.map(|actor| actor.0))
            .bind(request.lab_result.as_ref().map(Json))
            .bind(request.consultation.as_ref().map(Json))
            .bind(request.updated_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = updated else {
            let actual: Option<i64> =
                sqlx::query_scalar("SELECT version FROM test_requests WHERE id = $1")
                    .bind(request.id.0)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Err(match actual {
                Some(actual) => PersistenceError::VersionConflict {
                    request_id: request.id,
                    expected: expected_version,
                    actual,
                },
                None => PersistenceError::NotFound {
                    request_id: request.id,
                },
            });
        };

        sqlx::query(
            "INSERT INTO test_request_transitions \
             (request_id, from_status, to_status, changed_by, changed_by_role, happened_on, \
              correlation_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(transition.request_id.0)
        .bind(transition.from_status.as_str())
        .bind(transition.to_status.as_str())
        .bind(transition.changed_by.0)
        .bind(transition.changed_by_role.as_str())
        .bind(transition.happened_on)
        .bind(transition.correlation_id)
        .bind(transition.metadata())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn query_by_status(&self, status: RequestStatus) -> PersistenceResult<Vec<TestRequest>> {
        let sql =
            format!("SELECT {REQUEST_COLUMNS} FROM test_requests WHERE status = $1 ORDER BY id");
        self.fetch_requests(&sql, status.as_str()).await
    }

    async fn query_by_assignee(
        &self,
        actor: ActorId,
        slot: AssigneeSlot,
    ) -> PersistenceResult<Vec<TestRequest>> {
        let column = match slot {
            AssigneeSlot::LabTechnician => "assigned_lab_technician",
            AssigneeSlot::Doctor => "assigned_doctor",
        };
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM test_requests WHERE {column} = $1 ORDER BY id"
        );
        self.fetch_requests(&sql, actor.0).await
    }

    async fn load_transitions(
        &self,
        id: TestRequestId,
    ) -> PersistenceResult<Vec<TransitionRecord>> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM test_requests WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(PersistenceError::NotFound { request_id: id });
        }

        sqlx::query_as::<_, TransitionRow>(
            "SELECT request_id, from_status, to_status, changed_by, changed_by_role, \
                    happened_on, correlation_id \
             FROM test_request_transitions WHERE request_id = $1 ORDER BY id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(TransitionRecord::try_from)
        .collect()
    }
}
