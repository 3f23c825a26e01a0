use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use csrd_core::AppError;
use csrd_domain::UserId;
use tower_sessions::Session;

use crate::error::ApiResult;
use crate::handlers::auth::SESSION_USER_KEY;
use crate::state::AppState;

/// Resolves the user bound to the session and stores it as a request extension.
pub async fn require_user(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session user: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let user_id = UserId::new(user_id)
        .map_err(|_| AppError::Unauthorized("authentication required".to_owned()))?;

    let user = state
        .auth_service
        .find_user(&user_id)
        .await
        .map_err(|error| match error {
            AppError::NotFound(_) => AppError::Unauthorized("unknown user".to_owned()),
            other => other,
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
