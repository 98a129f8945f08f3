// Record Store Gateway: persists normalized records under a generated id.
// Handlers only see the `RecordStore` trait; the pool behind it is injected.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::NormalizedResume;

pub type RecordId = Uuid;

pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;

/// Whole-record persistence: a save either writes the full record or nothing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a record and returns its new id. Failures map to `StoreUnavailable`.
    async fn save(&self, record: &NormalizedResume) -> Result<RecordId, AppError>;

    /// Loads a record. Unknown ids map to `NotFound`.
    async fn load(&self, id: RecordId) -> Result<NormalizedResume, AppError>;
}

pub(crate) fn not_found(id: RecordId) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}
