//! Generic repository contract
//!
//! `CrudRepository` is the entity-agnostic persistence contract the domain
//! repositories build on, parametrized by entity type, create-input shape,
//! and update-input shape. Per-entity traits (`UserRepository`,
//! `NewsRepository`, ...) extend it with their scoped operations and are
//! consumed as `Arc<dyn ...>` by the service layer.
//!
//! Contract notes:
//! - lookups return `Ok(None)` for absent rows, never a placeholder value
//! - every mutation commits its own unit of work and returns the re-read
//!   row, so generated ids and server-assigned timestamps are materialized
//! - `update` applies only the fields present in the input (partial update)

use anyhow::Result;
use async_trait::async_trait;

/// Entity-agnostic create/read/update/delete operations.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    /// The persisted entity type
    type Entity: Send + Sync;
    /// Input shape for `create`
    type CreateInput: Send + Sync;
    /// Input shape for `update` (all-optional fields)
    type UpdateInput: Send + Sync;

    /// Fetch a single row by primary key.
    async fn get(&self, id: i64) -> Result<Option<Self::Entity>>;

    /// Fetch up to `limit` rows after skipping `skip`, primary key ascending
    /// unless an extension documents another order. A `limit` of 0 yields an
    /// empty sequence.
    async fn get_multi(&self, skip: i64, limit: i64) -> Result<Vec<Self::Entity>>;

    /// Insert a new row and return it fully materialized.
    async fn create(&self, input: &Self::CreateInput) -> Result<Self::Entity>;

    /// Apply the fields present in `input` to `target`, leaving unset fields
    /// untouched, and return the refreshed row.
    async fn update(
        &self,
        target: &Self::Entity,
        input: &Self::UpdateInput,
    ) -> Result<Self::Entity>;

    /// Delete the row by id, returning it as it existed before deletion.
    async fn remove(&self, id: i64) -> Result<Option<Self::Entity>>;
}
