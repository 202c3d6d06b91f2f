use anyhow::anyhow;
use std::env;

use vouch_core::token::DEFAULT_TOKEN_TTL_SECS;

/// Server configuration loaded via environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: Option<String>,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,

    // Development settings: run against the in-memory store, no database
    pub dev_mode: bool,

    // Token signing secret and lifetime
    pub token_secret: String,
    pub token_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        // The signing secret has no development fallback: a missing or empty
        // value fails startup instead of silently signing with a known key.
        let token_secret = env::var("AUTH_TOKEN_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| anyhow!("AUTH_TOKEN_SECRET must be set to a non-empty value"))?;

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            database_url: env::var("DATABASE_URL").ok(),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),

            dev_mode: env::var("DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),

            token_secret,
            token_ttl_secs: env::var("AUTH_TOKEN_TTL_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        })
    }
}
