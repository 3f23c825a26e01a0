use axum::Json;
use axum::extract::{Extension, Path, State};
use csrd_core::AppError;
use csrd_domain::{OrgUnitId, User, UserId};

use crate::dto::{AssignTeamRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = UserId::new(user_id)?;
    require_self_or_admin(&actor, &user_id)?;

    let user = state.auth_service.find_user(&user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn assign_team_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignTeamRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = UserId::new(user_id)?;
    require_self_or_admin(&actor, &user_id)?;

    let user = state
        .auth_service
        .assign_team(&user_id, &OrgUnitId::new(payload.team_id)?)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

fn require_self_or_admin(actor: &User, user_id: &UserId) -> Result<(), AppError> {
    if actor.is_admin() || actor.id() == user_id {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "user '{user_id}' can only be managed by an administrator"
    )))
}
