use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use vouch_core::{
    IdentityError, NewIdentity, UpdateIdentity,
    api_types::ApiResponse,
    identity::record::IdentityProfile,
    token::IssuedToken,
};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<NewIdentity>,
) -> AppResult<(StatusCode, Json<ApiResponse<IdentityProfile>>)> {
    let profile = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(profile))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<IssuedToken>>> {
    let profile = state
        .service
        .authenticate_credentials(&request.email, &request.password)
        .await
        .map_err(|err| match err {
            // One message for both failure paths so callers cannot probe
            // which emails exist.
            IdentityError::NotFound | IdentityError::Unauthorized => {
                AppError::unauthorized("Invalid credentials")
            }
            other => AppError::from(other),
        })?;

    let token = state.service.issue_token(profile.id)?;
    Ok(Json(ApiResponse::success(token)))
}

pub async fn me(
    Extension(profile): Extension<IdentityProfile>,
) -> AppResult<Json<ApiResponse<IdentityProfile>>> {
    Ok(Json(ApiResponse::success(profile)))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(profile): Extension<IdentityProfile>,
    Json(request): Json<UpdateIdentity>,
) -> AppResult<Json<ApiResponse<IdentityProfile>>> {
    let updated = state.service.update(profile.id, request).await?;
    Ok(Json(ApiResponse::success(updated)))
}
