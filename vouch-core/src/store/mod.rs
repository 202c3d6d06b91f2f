//! Credential store ports and implementations
//!
//! The engine talks to persistence through the [`IdentityStore`] trait so
//! the service can run against PostgreSQL in production and the in-memory
//! store in tests and dev mode. Implementations enforce case-insensitive
//! email uniqueness and atomic per-record writes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::identity::record::Identity;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryIdentityStore;
pub use postgres::PostgresIdentityStore;

/// Durable identity repository.
///
/// Email lookup is exact-match; uniqueness alone is case-insensitive, so an
/// insert or update whose email collides with an existing record under any
/// casing fails with `Conflict`.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>>;
    async fn insert(&self, identity: &Identity) -> Result<()>;
    async fn update(&self, identity: &Identity) -> Result<()>;
}
