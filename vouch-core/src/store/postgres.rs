use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{IdentityError, Result};
use crate::identity::record::Identity;
use crate::store::IdentityStore;

/// Name of the unique index on `lower(email)`; a violation of this
/// constraint is the only condition reported as `Conflict`.
const EMAIL_UNIQUE_CONSTRAINT: &str = "identities_email_lower_key";

/// PostgreSQL-backed implementation of the [`IdentityStore`] port.
#[derive(Clone, Debug)]
pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_write_error(err: sqlx::Error, action: &str) -> IdentityError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return IdentityError::Conflict("Email already exists".to_string());
        }
    }
    IdentityError::Internal(format!("failed to {action} identity: {err}"))
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        sqlx::query_as::<_, Identity>(
            r#"
            SELECT id, name, email, password_hash, age, created_at, updated_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|err| IdentityError::Internal(format!("failed to get identity by email: {err}")))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Identity>> {
        sqlx::query_as::<_, Identity>(
            r#"
            SELECT id, name, email, password_hash, age, created_at, updated_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|err| IdentityError::Internal(format!("failed to get identity by id: {err}")))
    }

    async fn insert(&self, identity: &Identity) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO identities (id, name, email, password_hash, age, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(identity.id)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(identity.age)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(self.pool())
        .await
        .map_err(|err| map_write_error(err, "create"))?;

        info!("created identity: {} ({})", identity.email, identity.id);
        Ok(())
    }

    async fn update(&self, identity: &Identity) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET name = $2, email = $3, password_hash = $4, age = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(identity.id)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(identity.age)
        .bind(identity.updated_at)
        .execute(self.pool())
        .await
        .map_err(|err| map_write_error(err, "update"))?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound);
        }

        info!("updated identity: {}", identity.id);
        Ok(())
    }
}
