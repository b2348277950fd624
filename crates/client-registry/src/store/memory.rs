//! In-memory client store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Client, ClientStore, StoreError};

/// In-memory client store with the same uniqueness contract as Postgres.
///
/// Backs the integration tests, which exercise the HTTP surface without a
/// database.
#[derive(Clone, Default)]
pub struct MemoryClientStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    clients: HashMap<String, Client>,
}

impl MemoryClientStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a client by normalized number.
    pub async fn get(&self, phone_number: &str) -> Option<Client> {
        self.inner.read().await.clients.get(phone_number).cloned()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn insert(&self, phone_number: &str) -> Result<Client, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.clients.contains_key(phone_number) {
            return Err(StoreError::DuplicateNumber(phone_number.to_owned()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let client = Client {
            id: inner.next_id,
            phone_number: phone_number.to_owned(),
            created_at: now,
            updated_at: now,
        };

        inner
            .clients
            .insert(phone_number.to_owned(), client.clone());

        Ok(client)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.clients.len() as i64)
    }
}
