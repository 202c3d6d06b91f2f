use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use vouch_core::IdentityError;

use crate::infra::{app_state::AppState, errors::AppError};

/// Require a valid bearer token and attach the authenticated profile to the
/// request. A token whose identity no longer exists is rejected the same way
/// as a bad signature; only store malfunctions surface as 500.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;

    let profile = state
        .service
        .authenticate_token(&token)
        .await
        .map_err(|err| match err {
            IdentityError::Internal(_) => AppError::from(err),
            _ => AppError::unauthorized("Invalid token"),
        })?;

    request.extensions_mut().insert(profile);
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::unauthorized("Missing bearer token"));
    }

    Ok(auth_header[7..].to_string())
}
