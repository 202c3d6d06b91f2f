//! Vouch server internals: configuration, router, handlers, and middleware.

pub mod identity;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::config::Config;
