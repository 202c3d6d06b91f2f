use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{IdentityError, Result};
use crate::identity::record::Identity;
use crate::store::IdentityStore;

/// In-memory [`IdentityStore`] with the same conflict semantics as the
/// PostgreSQL implementation. Backs the test suite and `DEV_MODE` runs where
/// no database is available.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    records: RwLock<HashMap<Uuid, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a record by id. Deletion is not part of the store port; this
    /// exists so tests and dev tooling can exercise the token-for-missing-
    /// identity path.
    pub async fn remove(&self, id: Uuid) -> Option<Identity> {
        self.records.write().await.remove(&id)
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn insert(&self, identity: &Identity) -> Result<()> {
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|r| r.email.eq_ignore_ascii_case(&identity.email))
        {
            return Err(IdentityError::Conflict("Email already exists".to_string()));
        }
        records.insert(identity.id, identity.clone());
        Ok(())
    }

    async fn update(&self, identity: &Identity) -> Result<()> {
        let mut records = self.records.write().await;
        if !records.contains_key(&identity.id) {
            return Err(IdentityError::NotFound);
        }
        if records
            .values()
            .any(|r| r.id != identity.id && r.email.eq_ignore_ascii_case(&identity.email))
        {
            return Err(IdentityError::Conflict("Email already exists".to_string()));
        }
        records.insert(identity.id, identity.clone());
        Ok(())
    }
}
