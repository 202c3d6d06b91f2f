//! Identity records and their sanitized projections
//!
//! The stored [`Identity`] carries the password hash and deliberately does
//! not implement `Serialize`: the only view that can cross the API boundary
//! is [`IdentityProfile`], which omits the hash entirely. Request payloads
//! validate themselves before any hashing or store I/O happens.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum accepted email length, checked after trimming.
pub const MIN_EMAIL_LENGTH: usize = 5;
/// Minimum accepted plaintext password length, checked before hashing.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles"));

/// Stored representation of a user identity.
///
/// `password_hash` holds an Argon2id PHC string, never plaintext. The type
/// intentionally has no `Serialize` impl so the hash cannot leak through a
/// forgotten projection; convert to [`IdentityProfile`] before returning a
/// record to any caller outside the store boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Identity {
    /// Unique identifier, generated at creation, immutable
    pub id: Uuid,
    /// Free-text display name
    pub name: String,
    /// Trimmed email address, case-insensitively unique across all records
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Age in years, 1..=100
    pub age: i32,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutating save
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Sanitized projection, safe to serialize and return to callers.
    pub fn profile(&self) -> IdentityProfile {
        IdentityProfile::from(self)
    }
}

/// Sanitized view of an [`Identity`]: every field except the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityProfile {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            age: identity.age,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

/// Validation errors for identity input
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Name must not be empty")]
    InvalidName,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password too short: minimum 6 characters required")]
    PasswordTooShort,

    #[error("Age must be between 1 and 100")]
    InvalidAge,
}

/// Payload for creating a new identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdentity {
    pub name: String,
    /// Email address; trimmed before validation and storage
    pub email: String,
    /// Plaintext password, hashed before it ever reaches the store
    pub password: String,
    pub age: i32,
}

impl NewIdentity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_email(self.email.trim())?;
        validate_password(&self.password)?;
        validate_age(self.age)
    }
}

/// Partial update for an existing identity; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    /// New plaintext password; triggers re-hashing when present
    pub password: Option<String>,
    pub age: Option<i32>,
}

impl UpdateIdentity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email.trim())?;
        }
        if let Some(ref password) = self.password {
            validate_password(password)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() < MIN_EMAIL_LENGTH || !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), ValidationError> {
    if !(1..=100).contains(&age) {
        return Err(ValidationError::InvalidAge);
    }
    Ok(())
}
