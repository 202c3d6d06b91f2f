//! # Vouch Server
//!
//! User-identity service.
//!
//! ## Overview
//!
//! Vouch stores identity records, enforces credential hygiene, and issues and
//! verifies bearer tokens:
//!
//! - **Registration**: validated identity creation with Argon2id-hashed
//!   credentials
//! - **Credential Login**: email + password in, signed expiring token out
//! - **Token Authentication**: stateless verification plus a store lookup to
//!   confirm the identity still exists
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL for persistent storage (in-memory store in `DEV_MODE`)
//! - Argon2id for password hashing
//! - HS256 JWTs for bearer tokens

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vouch_core::{
    CredentialHasher, IdentityService, TokenSigner,
    store::{IdentityStore, InMemoryIdentityStore, PostgresIdentityStore},
};
use vouch_server::{AppState, Config, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn IdentityStore> = if config.dev_mode {
        warn!("DEV_MODE is set; identities live in memory and vanish on shutdown");
        Arc::new(InMemoryIdentityStore::new())
    } else {
        let database_url = config
            .database_url
            .as_deref()
            .context("DATABASE_URL must be set unless DEV_MODE=true")?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("failed to connect to PostgreSQL")?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        Arc::new(PostgresIdentityStore::new(pool))
    };

    let hasher = CredentialHasher::new()
        .map_err(|err| anyhow::anyhow!("invalid Argon2 configuration: {err}"))?;
    let signer = TokenSigner::new(&config.token_secret, config.token_ttl_secs);
    let service = Arc::new(IdentityService::new(store, hasher, signer));

    let state = AppState {
        service,
        config: Arc::new(config.clone()),
    };

    let app = routes::create_api_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("invalid server address")?;

    info!("vouch-server listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid CORS origin")?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}
