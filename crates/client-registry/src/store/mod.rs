//! Client persistence.

mod memory;
mod postgres;

pub use memory::MemoryClientStore;
pub use postgres::PgClientStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// A registered client row.
///
/// `phone_number` is always the E.164 form; it is the uniqueness key.
/// `id` and both timestamps are assigned by the store on insert.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Client {
    pub id: i64,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store errors. Unique-constraint violations stay distinguishable from
/// every other database failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("client with phone number {0:?} already exists")]
    DuplicateNumber(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Transactional client store shared by all request handlers.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a new client row for an already-normalized number.
    ///
    /// The insert and the read-back of the generated id and timestamps run
    /// in one transaction. A duplicate normalized number yields
    /// [`StoreError::DuplicateNumber`] and leaves the store untouched.
    async fn insert(&self, phone_number: &str) -> Result<Client, StoreError>;

    /// Number of registered clients.
    async fn count(&self) -> Result<i64, StoreError>;
}
