//! # Vouch Core
//!
//! Core library for the Vouch identity service: credential hashing, stateless
//! token issuance/verification, and identity storage.
//!
//! ## Overview
//!
//! `vouch-core` is the engine behind the Vouch server, offering:
//!
//! - **Identity Records**: validated user records with a compiler-enforced
//!   sanitization boundary (the stored hash cannot be serialized)
//! - **Credential Hashing**: Argon2id with per-call random salts
//! - **Bearer Tokens**: HS256-signed, self-contained tokens with mandatory
//!   expiry
//! - **Store Abstraction**: trait-based repository with PostgreSQL and
//!   in-memory implementations
//!
//! ## Architecture
//!
//! - [`identity::record`]: the record, its sanitized projection, and input
//!   validation
//! - [`identity::crypto`]: password hashing and verification
//! - [`identity::token`]: token issue/verify, a pure cryptographic boundary
//! - [`identity::service`]: orchestration of the above against a store
//! - [`store`]: the `IdentityStore` port and its implementations
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vouch_core::{
//!     CredentialHasher, IdentityService, NewIdentity, TokenSigner,
//!     store::InMemoryIdentityStore, token::DEFAULT_TOKEN_TTL_SECS,
//! };
//!
//! # async fn demo() -> vouch_core::Result<()> {
//! let service = IdentityService::new(
//!     Arc::new(InMemoryIdentityStore::new()),
//!     CredentialHasher::new().expect("default Argon2 parameters are valid"),
//!     TokenSigner::new("a-long-random-secret", DEFAULT_TOKEN_TTL_SECS),
//! );
//!
//! let profile = service
//!     .create(NewIdentity {
//!         name: "Ann".to_string(),
//!         email: "ann@x.com".to_string(),
//!         password: "secret1".to_string(),
//!         age: 30,
//!     })
//!     .await?;
//!
//! let token = service.issue_token(profile.id)?;
//! let verified = service.authenticate_token(&token.access_token).await?;
//! assert_eq!(verified.id, profile.id);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Common API types used across the Vouch services
pub mod api_types;

/// Error taxonomy shared by every core operation
pub mod error;

/// Identity records, hashing, tokens, and orchestration
pub mod identity;

/// Credential store port and implementations
pub mod store;

pub use error::{IdentityError, Result};
pub use identity::crypto::CredentialHasher;
pub use identity::record::{Identity, IdentityProfile, NewIdentity, UpdateIdentity};
pub use identity::service::IdentityService;
pub use identity::token::{self, Claims, IssuedToken, TokenSigner};
pub use store::IdentityStore;
