use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{NormalizedResume, ResumeRow};
use crate::store::{not_found, RecordId, RecordStore};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id          UUID PRIMARY KEY,
        record      JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// Postgres-backed gateway. One row per record; the record is a JSONB document.
///
/// The `resumes` table is created on first use rather than at startup so a
/// lazily-connected pool stays lazy.
pub struct PgRecordStore {
    pool: PgPool,
    schema_ready: OnceCell<()>,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema_ready: OnceCell::new(),
        }
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
                info!("resumes table ready");
                Ok::<(), AppError>(())
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn save(&self, record: &NormalizedResume) -> Result<RecordId, AppError> {
        self.ensure_schema().await?;

        let id = Uuid::new_v4();
        // Single INSERT: the record is written whole or not at all.
        sqlx::query("INSERT INTO resumes (id, record) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(record))
            .execute(&self.pool)
            .await?;

        info!("Inserted resume {id}");
        Ok(id)
    }

    async fn load(&self, id: RecordId) -> Result<NormalizedResume, AppError> {
        self.ensure_schema().await?;

        let row: Option<ResumeRow> =
            sqlx::query_as("SELECT id, record, created_at FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let row = row.ok_or_else(|| not_found(id))?;
        NormalizedResume::from_value(row.record).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("stored resume {id} is malformed: {e}"))
        })
    }
}
