use axum::Json;
use axum::extract::{Path, Query, State};
use csrd_domain::{OrgUnitId, OrgUnitLevel};
use serde::Deserialize;

use crate::dto::OrgUnitResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitQuery {
    pub parent_id: Option<String>,
}

pub async fn list_org_units_handler(
    State(state): State<AppState>,
    Path(level): Path<String>,
    Query(query): Query<OrgUnitQuery>,
) -> ApiResult<Json<Vec<OrgUnitResponse>>> {
    let level = level.parse::<OrgUnitLevel>()?;
    let parent_id = query.parent_id.map(OrgUnitId::new).transpose()?;

    let units = state
        .org_unit_service
        .list(level, parent_id.as_ref())
        .await?
        .into_iter()
        .map(OrgUnitResponse::from)
        .collect();

    Ok(Json(units))
}
