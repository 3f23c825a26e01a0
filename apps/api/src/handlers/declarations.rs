use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use csrd_application::{DeclarationOutcome, DeclarationQuery};
use csrd_core::{AppError, AppResult};
use csrd_domain::{DeclarationId, DeclarationStatus, OrgUnitId, TemplateId, User, UserId};
use serde::Deserialize;

use crate::dto::{
    CreateDeclarationRequest, DeclarationResponse, DeclarationStatsResponse,
    UpdateDeclarationRequest, ValidationErrorsResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Listing filters, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationListQuery {
    pub author_id: Option<String>,
    pub team_id: Option<String>,
    pub form_template_id: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<DeclarationListQuery> for DeclarationQuery {
    type Error = AppError;

    fn try_from(value: DeclarationListQuery) -> AppResult<Self> {
        Ok(Self {
            author_id: value.author_id.map(UserId::new).transpose()?,
            team_id: value.team_id.map(OrgUnitId::new).transpose()?,
            form_template_id: value.form_template_id.map(TemplateId::new).transpose()?,
            status: value
                .status
                .map(|status| status.parse::<DeclarationStatus>())
                .transpose()?,
        })
    }
}

pub async fn list_declarations_handler(
    State(state): State<AppState>,
    Query(query): Query<DeclarationListQuery>,
) -> ApiResult<Json<Vec<DeclarationResponse>>> {
    let declarations = state
        .declaration_service
        .list(&DeclarationQuery::try_from(query)?)
        .await?
        .into_iter()
        .map(DeclarationResponse::from)
        .collect();

    Ok(Json(declarations))
}

pub async fn declaration_stats_handler(
    State(state): State<AppState>,
    Query(query): Query<DeclarationListQuery>,
) -> ApiResult<Json<DeclarationStatsResponse>> {
    let stats = state
        .declaration_service
        .stats(&DeclarationQuery::try_from(query)?)
        .await?;

    Ok(Json(DeclarationStatsResponse::from(stats)))
}

pub async fn create_declaration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateDeclarationRequest>,
) -> ApiResult<(StatusCode, Json<DeclarationResponse>)> {
    let declaration = state
        .declaration_service
        .create(
            &user,
            &TemplateId::new(payload.form_template_id)?,
            payload.form_data,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DeclarationResponse::from(declaration)),
    ))
}

pub async fn get_declaration_handler(
    State(state): State<AppState>,
    Path(declaration_id): Path<String>,
) -> ApiResult<Json<DeclarationResponse>> {
    let declaration = state
        .declaration_service
        .get(&DeclarationId::new(declaration_id)?)
        .await?;

    Ok(Json(DeclarationResponse::from(declaration)))
}

pub async fn update_declaration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(declaration_id): Path<String>,
    Json(payload): Json<UpdateDeclarationRequest>,
) -> ApiResult<Response> {
    let outcome = state
        .declaration_service
        .update(&user, &DeclarationId::new(declaration_id)?, payload.form_data)
        .await?;

    Ok(outcome_response(outcome))
}

pub async fn submit_declaration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(declaration_id): Path<String>,
) -> ApiResult<Response> {
    let outcome = state
        .declaration_service
        .submit(&user, &DeclarationId::new(declaration_id)?)
        .await?;

    Ok(outcome_response(outcome))
}

pub async fn validate_declaration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(declaration_id): Path<String>,
) -> ApiResult<Json<DeclarationResponse>> {
    let declaration = state
        .declaration_service
        .validate(&user, &DeclarationId::new(declaration_id)?)
        .await?;

    Ok(Json(DeclarationResponse::from(declaration)))
}

pub async fn delete_declaration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(declaration_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .declaration_service
        .delete(&user, &DeclarationId::new(declaration_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Rejected answers are a 422 with per-field codes, not an error.
fn outcome_response(outcome: DeclarationOutcome) -> Response {
    match outcome {
        DeclarationOutcome::Saved(declaration) => {
            Json(DeclarationResponse::from(declaration)).into_response()
        }
        DeclarationOutcome::Rejected(report) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorsResponse::from(report)),
        )
            .into_response(),
    }
}
