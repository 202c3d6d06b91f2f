//! Identity orchestration
//!
//! [`IdentityService`] answers the two questions the rest of the system asks:
//! "do these credentials match a stored identity?" and "does this token
//! represent a currently valid identity?". It also owns the create/update
//! paths so hashing and timestamping can never be skipped by a call site.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{IdentityError, Result};
use crate::identity::crypto::CredentialHasher;
use crate::identity::record::{Identity, IdentityProfile, NewIdentity, UpdateIdentity};
use crate::identity::token::{IssuedToken, TokenSigner};
use crate::store::IdentityStore;

/// Orchestrates the hasher, token signer, and credential store.
///
/// Every success path returns the sanitized [`IdentityProfile`]; the stored
/// record with its hash never crosses this boundary. Hashing and
/// verification run on the blocking pool so Argon2 cannot stall the async
/// executor.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn IdentityStore>,
    hasher: Arc<CredentialHasher>,
    signer: TokenSigner,
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService").finish_non_exhaustive()
    }
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        hasher: CredentialHasher,
        signer: TokenSigner,
    ) -> Self {
        Self {
            store,
            hasher: Arc::new(hasher),
            signer,
        }
    }

    /// Validate, hash, stamp, and persist a new identity.
    ///
    /// A hashing failure aborts the save before any store write. Duplicate
    /// email under any casing surfaces as `Conflict` from the store.
    pub async fn create(&self, request: NewIdentity) -> Result<IdentityProfile> {
        request.validate()?;

        let password_hash = self.hash_on_blocking_pool(request.password).await?;

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email.trim().to_string(),
            password_hash,
            age: request.age,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&identity).await?;

        info!("identity created: {} ({})", identity.email, identity.id);
        Ok(identity.profile())
    }

    /// Apply a partial update to an existing identity.
    ///
    /// `updated_at` is refreshed on every save; the password is re-hashed
    /// only when the patch carries a new one. The service mutates an owned
    /// copy, so the stored record changes only after the write succeeds.
    pub async fn update(&self, id: Uuid, request: UpdateIdentity) -> Result<IdentityProfile> {
        request.validate()?;

        let mut identity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound)?;

        if let Some(name) = request.name {
            identity.name = name;
        }
        if let Some(email) = request.email {
            identity.email = email.trim().to_string();
        }
        if let Some(age) = request.age {
            identity.age = age;
        }
        if let Some(password) = request.password {
            identity.password_hash = self.hash_on_blocking_pool(password).await?;
        }
        identity.updated_at = Utc::now();

        self.store.update(&identity).await?;

        info!("identity updated: {}", identity.id);
        Ok(identity.profile())
    }

    /// Answer "do these credentials match a stored identity?".
    ///
    /// Unknown email is `NotFound` and a wrong password is `Unauthorized`;
    /// the HTTP layer collapses both into one message so callers cannot
    /// probe which emails exist. A stored hash that fails to parse is an
    /// internal fault, not a credential failure.
    pub async fn authenticate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityProfile> {
        let identity = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(IdentityError::NotFound)?;

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let stored_hash = identity.password_hash.clone();
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|err| IdentityError::Internal(format!("verification task failed: {err}")))??;

        if !matched {
            debug!("credential mismatch for identity {}", identity.id);
            return Err(IdentityError::Unauthorized);
        }

        Ok(identity.profile())
    }

    /// Answer "does this token represent a currently valid identity?".
    ///
    /// Signature and expiry are checked first; a valid token whose identity
    /// has since disappeared from the store fails with `NotFound` rather
    /// than returning a partial record.
    pub async fn authenticate_token(&self, token: &str) -> Result<IdentityProfile> {
        let id = self.signer.verify(token)?;

        let identity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound)?;

        Ok(identity.profile())
    }

    /// Sign a fresh bearer token for an authenticated identity.
    pub fn issue_token(&self, id: Uuid) -> Result<IssuedToken> {
        Ok(IssuedToken {
            access_token: self.signer.issue(id)?,
            expires_in: self.signer.ttl_secs(),
        })
    }

    async fn hash_on_blocking_pool(&self, password: String) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| IdentityError::Internal(format!("hashing task failed: {err}")))??;
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::crypto::test_hasher;
    use crate::identity::token::DEFAULT_TOKEN_TTL_SECS;
    use crate::store::InMemoryIdentityStore;

    fn service() -> (IdentityService, Arc<InMemoryIdentityStore>) {
        let store = Arc::new(InMemoryIdentityStore::new());
        let signer = TokenSigner::new("test_secret_key_for_testing_only", DEFAULT_TOKEN_TTL_SECS);
        let service = IdentityService::new(store.clone(), test_hasher(), signer);
        (service, store)
    }

    fn ann() -> NewIdentity {
        NewIdentity {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: "secret1".to_string(),
            age: 30,
        }
    }

    #[tokio::test]
    async fn create_then_authenticate_by_credentials() {
        let (service, store) = service();

        let profile = service.create(ann()).await.unwrap();
        assert_eq!(profile.email, "ann@x.com");
        assert_eq!(profile.age, 30);

        // The stored record holds a hash, never the plaintext.
        let stored = store.find_by_id(profile.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(stored.password_hash.starts_with("$argon2id$"));

        let authed = service
            .authenticate_credentials("ann@x.com", "secret1")
            .await
            .unwrap();
        assert_eq!(authed.id, profile.id);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (service, _store) = service();
        service.create(ann()).await.unwrap();

        let result = service
            .authenticate_credentials("ann@x.com", "wrongpw")
            .await;
        assert!(matches!(result, Err(IdentityError::Unauthorized)));
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let (service, _store) = service();
        service.create(ann()).await.unwrap();

        let result = service.authenticate_credentials("nobody@x.com", "x").await;
        assert!(matches!(result, Err(IdentityError::NotFound)));
    }

    #[tokio::test]
    async fn duplicate_email_differing_only_in_case_conflicts() {
        let (service, _store) = service();
        service.create(ann()).await.unwrap();

        let mut second = ann();
        second.email = "ANN@x.com".to_string();
        let result = service.create(second).await;
        assert!(matches!(result, Err(IdentityError::Conflict(_))));
    }

    #[tokio::test]
    async fn token_round_trip_returns_the_same_identity() {
        let (service, _store) = service();
        let profile = service.create(ann()).await.unwrap();

        let issued = service.issue_token(profile.id).unwrap();
        assert_eq!(issued.expires_in, DEFAULT_TOKEN_TTL_SECS);

        let authed = service
            .authenticate_token(&issued.access_token)
            .await
            .unwrap();
        assert_eq!(authed.id, profile.id);
        assert_eq!(authed.email, "ann@x.com");
    }

    #[tokio::test]
    async fn token_for_deleted_identity_is_not_found() {
        let (service, store) = service();
        let profile = service.create(ann()).await.unwrap();
        let issued = service.issue_token(profile.id).unwrap();

        store.remove(profile.id).await.expect("record existed");

        let result = service.authenticate_token(&issued.access_token).await;
        assert!(matches!(result, Err(IdentityError::NotFound)));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_token() {
        let (service, _store) = service();
        let result = service.authenticate_token("not-a-token").await;
        assert!(matches!(result, Err(IdentityError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn update_rehashes_password_and_refreshes_updated_at() {
        let (service, store) = service();
        let profile = service.create(ann()).await.unwrap();
        let before = store.find_by_id(profile.id).await.unwrap().unwrap();

        let patch = UpdateIdentity {
            password: Some("hunter22".to_string()),
            ..Default::default()
        };
        let updated = service.update(profile.id, patch).await.unwrap();
        assert!(updated.updated_at >= updated.created_at);

        let after = store.find_by_id(profile.id).await.unwrap().unwrap();
        assert_ne!(after.password_hash, before.password_hash);
        assert_ne!(after.password_hash, "hunter22");
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);

        // Old credentials no longer authenticate, new ones do.
        assert!(matches!(
            service.authenticate_credentials("ann@x.com", "secret1").await,
            Err(IdentityError::Unauthorized)
        ));
        service
            .authenticate_credentials("ann@x.com", "hunter22")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_without_password_keeps_the_stored_hash() {
        let (service, store) = service();
        let profile = service.create(ann()).await.unwrap();
        let before = store.find_by_id(profile.id).await.unwrap().unwrap();

        let patch = UpdateIdentity {
            name: Some("Ann Smith".to_string()),
            ..Default::default()
        };
        let updated = service.update(profile.id, patch).await.unwrap();
        assert_eq!(updated.name, "Ann Smith");

        let after = store.find_by_id(profile.id).await.unwrap().unwrap();
        assert_eq!(after.password_hash, before.password_hash);
    }

    #[tokio::test]
    async fn update_of_missing_identity_is_not_found() {
        let (service, _store) = service();
        let result = service
            .update(Uuid::new_v4(), UpdateIdentity::default())
            .await;
        assert!(matches!(result, Err(IdentityError::NotFound)));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_before_any_write() {
        let (service, store) = service();

        let mut request = ann();
        request.password = "tiny".to_string();
        let result = service.create(request).await;
        assert!(matches!(result, Err(IdentityError::Validation(_))));
        assert!(store.find_by_email("ann@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_an_internal_error() {
        let (service, store) = service();
        let profile = service.create(ann()).await.unwrap();

        let mut corrupted = store.find_by_id(profile.id).await.unwrap().unwrap();
        corrupted.password_hash = "corrupted".to_string();
        store.update(&corrupted).await.unwrap();

        let result = service
            .authenticate_credentials("ann@x.com", "secret1")
            .await;
        assert!(matches!(result, Err(IdentityError::Internal(_))));
    }

    #[tokio::test]
    async fn emails_are_trimmed_before_storage() {
        let (service, _store) = service();

        let mut request = ann();
        request.email = "  ann@x.com  ".to_string();
        let profile = service.create(request).await.unwrap();
        assert_eq!(profile.email, "ann@x.com");

        service
            .authenticate_credentials("ann@x.com", "secret1")
            .await
            .unwrap();
    }
}
