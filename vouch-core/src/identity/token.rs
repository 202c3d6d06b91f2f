use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IdentityError, Result};

/// Default access-token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 900; // 15 minutes

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // Identity ID
    pub exp: i64,  // Expiration time
    pub iat: i64,  // Issued at
}

/// Token issued after successful credential authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Signed bearer token for API authentication
    pub access_token: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

/// Issues and verifies HS256-signed bearer tokens.
///
/// Keys are derived once from the process-wide signing secret; the signer is
/// a pure cryptographic boundary and never touches the store. Every issued
/// token carries a mandatory expiry claim.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
            validation,
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl.num_seconds() as u64
    }

    /// Sign a token binding the given identity id, expiring after the
    /// configured TTL.
    pub fn issue(&self, id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: id,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| IdentityError::Internal(format!("failed to sign token: {err}")))
    }

    /// Check signature and expiry, returning the embedded identity id.
    /// Any failure surfaces as [`IdentityError::InvalidToken`] with the
    /// decoder's error attached as the cause.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims.sub)
    }
}
