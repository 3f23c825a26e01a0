use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use csrd_core::AppError;
use csrd_domain::User;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{LoginRequest, RegisterRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Session entry holding the identifier of the logged-in user.
pub const SESSION_USER_KEY: &str = "user_id";

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .auth_service
        .login(&payload.identifier, &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    session
        .insert(SESSION_USER_KEY, user.id().as_str())
        .await
        .map_err(|error| AppError::Internal(format!("failed to store session user: {error}")))?;
    info!(user_id = %user.id(), "user logged in");

    Ok(Json(UserResponse::from(user)))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.auth_service.register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
