//! Postgres-backed client store.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::{Client, ClientStore, StoreError};
use crate::config::DatabaseConfig;

/// Client store backed by a shared Postgres connection pool.
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    /// Connect a pool with the configured URL and size.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the clients table when it does not exist yet.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clients (
                id BIGSERIAL PRIMARY KEY,
                phone_number TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn insert(&self, phone_number: &str) -> Result<Client, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (phone_number)
            VALUES ($1)
            RETURNING id, phone_number, created_at, updated_at
            "#,
        )
        .bind(phone_number)
        .fetch_one(&mut *tx)
        .await;

        // An uncommitted transaction rolls back when dropped, including on
        // early returns below.
        let client = match inserted {
            Ok(client) => client,
            Err(e) => {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return Err(StoreError::DuplicateNumber(phone_number.to_owned()));
                    }
                }
                return Err(e.into());
            }
        };

        tx.commit().await?;
        Ok(client)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }
}
