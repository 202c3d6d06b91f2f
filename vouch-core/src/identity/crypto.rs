use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString},
};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::Zeroizing;

/// Centralized password hashing for the identity engine.
///
/// Wraps Argon2id with a single parameter choice so every credential in the
/// system is hashed the same way. Output is a PHC string carrying the salt
/// and parameters, so verification needs no side channel.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid Argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("password hashing error: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

impl CredentialHasher {
    /// Recommended defaults target ~64 MiB memory and 3 iterations which is a
    /// solid baseline for servers without dedicated tuning.
    const DEFAULT_MEMORY_KIB: u32 = 64 * 1024; // 64 MiB
    const DEFAULT_ITERATIONS: u32 = 3;
    const DEFAULT_PARALLELISM: u32 = 1;
    const SALT_LENGTH: usize = Salt::RECOMMENDED_LENGTH;

    /// Build a hasher with default Argon2id parameters.
    pub fn new() -> Result<Self, CryptoError> {
        let params = ParamsBuilder::new()
            .m_cost(Self::DEFAULT_MEMORY_KIB)
            .t_cost(Self::DEFAULT_ITERATIONS)
            .p_cost(Self::DEFAULT_PARALLELISM)
            .output_len(32)
            .build()
            .map_err(|err| CryptoError::InvalidParams(err.to_string()))?;

        Ok(Self::with_params(params))
    }

    /// Build a hasher with caller-specified parameters (useful for tests or
    /// constrained environments).
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
        }
    }

    /// Hash a plaintext password with a fresh random salt. Output varies
    /// between calls for the same input; the resulting PHC string is suitable
    /// for storage. Length preconditions are enforced upstream by record
    /// validation, not here.
    pub fn hash(&self, password: &str) -> Result<String, CryptoError> {
        let material = Zeroizing::new(password.as_bytes().to_vec());

        // Use the workspace's rand crate so minimal builds avoid depending on
        // password_hash's optional rand_core shim.
        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| CryptoError::Hash(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| CryptoError::Hash(err.to_string()))?;

        let hash = self
            .argon2
            .hash_password(&material, &salt)
            .map_err(|err| CryptoError::Hash(err.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Verify a plaintext password against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; an `Err` means the stored value could not
    /// be parsed as a hash at all, which the service treats as an internal
    /// fault rather than a credential failure.
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool, CryptoError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|err| CryptoError::MalformedHash(err.to_string()))?;

        let material = Zeroizing::new(password.as_bytes().to_vec());
        Ok(self.argon2.verify_password(&material, &parsed).is_ok())
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> CredentialHasher {
    let params = Params::new(64, 1, 1, Some(32)).expect("test params are valid");
    CredentialHasher::with_params(params)
}
