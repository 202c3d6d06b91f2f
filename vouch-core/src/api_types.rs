//! Common types used across the API boundary

use serde::{Deserialize, Serialize};

/// Uniform response envelope returned by every successful HTTP endpoint.
/// Failure bodies are produced by the server's error type instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
        }
    }
}
