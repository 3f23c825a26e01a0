use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use csrd_core::AppResult;
use csrd_domain::{FormTemplate, FormTemplateInput, TemplateId, User};
use serde::Deserialize;

use super::require_admin;
use crate::dto::{
    FormTemplateRequest, FormTemplateResponse, PreviewRequest, PreviewResponse, SetActiveRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FormListQuery {
    /// Only templates accepting new declarations.
    pub active: Option<bool>,
}

pub async fn list_forms_handler(
    State(state): State<AppState>,
    Query(query): Query<FormListQuery>,
) -> ApiResult<Json<Vec<FormTemplateResponse>>> {
    let templates = if query.active.unwrap_or(false) {
        state.form_template_service.list_active().await?
    } else {
        state.form_template_service.list().await?
    };

    Ok(Json(to_responses(templates)?))
}

pub async fn create_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<FormTemplateRequest>,
) -> ApiResult<(StatusCode, Json<FormTemplateResponse>)> {
    require_admin(&user)?;

    let template = state
        .form_template_service
        .create(FormTemplateInput::try_from(payload)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FormTemplateResponse::try_from(template)?),
    ))
}

pub async fn get_form_handler(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> ApiResult<Json<FormTemplateResponse>> {
    let template = state
        .form_template_service
        .get(&TemplateId::new(template_id)?)
        .await?;

    Ok(Json(FormTemplateResponse::try_from(template)?))
}

/// Saves builder content. A published template yields a new draft version.
pub async fn save_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(template_id): Path<String>,
    Json(payload): Json<FormTemplateRequest>,
) -> ApiResult<Json<FormTemplateResponse>> {
    require_admin(&user)?;

    let template = state
        .form_template_service
        .save(
            &TemplateId::new(template_id)?,
            FormTemplateInput::try_from(payload)?,
        )
        .await?;

    Ok(Json(FormTemplateResponse::try_from(template)?))
}

pub async fn set_form_active_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(template_id): Path<String>,
    Json(payload): Json<SetActiveRequest>,
) -> ApiResult<Json<FormTemplateResponse>> {
    require_admin(&user)?;

    let template = state
        .form_template_service
        .set_active(&TemplateId::new(template_id)?, payload.is_active)
        .await?;

    Ok(Json(FormTemplateResponse::try_from(template)?))
}

pub async fn delete_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(template_id): Path<String>,
) -> ApiResult<StatusCode> {
    require_admin(&user)?;

    state
        .form_template_service
        .delete(&TemplateId::new(template_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn publish_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(template_id): Path<String>,
) -> ApiResult<Json<FormTemplateResponse>> {
    require_admin(&user)?;

    let template = state
        .form_template_service
        .publish(&TemplateId::new(template_id)?)
        .await?;

    Ok(Json(FormTemplateResponse::try_from(template)?))
}

pub async fn preview_form_handler(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    Json(payload): Json<PreviewRequest>,
) -> ApiResult<Json<PreviewResponse>> {
    let preview = state
        .form_template_service
        .preview(&TemplateId::new(template_id)?, &payload.answers)
        .await?;

    Ok(Json(PreviewResponse::try_from(preview)?))
}

pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<String>>> {
    let categories = state
        .form_template_service
        .categories()
        .await?
        .into_iter()
        .map(|category| category.as_str().to_owned())
        .collect();

    Ok(Json(categories))
}

fn to_responses(templates: Vec<FormTemplate>) -> AppResult<Vec<FormTemplateResponse>> {
    templates
        .into_iter()
        .map(FormTemplateResponse::try_from)
        .collect()
}
