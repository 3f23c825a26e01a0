use std::collections::BTreeMap;

use csrd_application::FormPreview;
use csrd_core::{AppError, AppResult, NonEmptyString};
use csrd_domain::{Answers, CategoryCode, FormSchema, FormTemplate, FormTemplateInput};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Builder content sent when creating or saving a template.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-template-request.ts"
)]
pub struct FormTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_code: Option<String>,
    /// Field list, or an object with `fields` and `branching`.
    #[serde(default)]
    #[ts(type = "unknown")]
    pub schema: Value,
}

impl TryFrom<FormTemplateRequest> for FormTemplateInput {
    type Error = AppError;

    fn try_from(value: FormTemplateRequest) -> AppResult<Self> {
        let schema = if value.schema.is_null() {
            FormSchema::default()
        } else {
            serde_json::from_value(value.schema)
                .map_err(|error| AppError::Validation(format!("invalid form schema: {error}")))?
        };

        Ok(Self {
            name: NonEmptyString::new(value.name)?,
            description: value.description,
            category_code: value
                .category_code
                .map(CategoryCode::new)
                .transpose()?
                .unwrap_or_default(),
            schema,
        })
    }
}

/// Incoming payload toggling whether a template accepts new declarations.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-active-request.ts"
)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// API representation of a form template.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-template-response.ts"
)]
pub struct FormTemplateResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category_code: String,
    #[ts(type = "unknown")]
    pub schema: Value,
    pub version: u32,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub parent_template_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<FormTemplate> for FormTemplateResponse {
    type Error = AppError;

    fn try_from(value: FormTemplate) -> AppResult<Self> {
        Ok(Self {
            id: value.id().to_string(),
            name: value.name().to_string(),
            description: value.description().to_owned(),
            category_code: value.category_code().as_str().to_owned(),
            schema: to_json(value.schema())?,
            version: value.version(),
            is_published: value.is_published(),
            published_at: value.published_at().map(|at| at.to_rfc3339()),
            parent_template_id: value.parent_template_id().map(ToString::to_string),
            is_active: value.is_active(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        })
    }
}

/// Answers to render a template preview against.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/preview-request.ts"
)]
pub struct PreviewRequest {
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub answers: Answers,
}

/// One visible field of a preview.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/preview-field-response.ts"
)]
pub struct PreviewFieldResponse {
    #[ts(type = "unknown")]
    pub field: Value,
    pub branching_number: Option<u32>,
    pub branching_color: Option<String>,
}

/// Visible fields plus inline validation of the preview answers.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/preview-response.ts"
)]
pub struct PreviewResponse {
    pub fields: Vec<PreviewFieldResponse>,
    pub errors: BTreeMap<String, String>,
    pub is_valid: bool,
}

impl TryFrom<FormPreview> for PreviewResponse {
    type Error = AppError;

    fn try_from(value: FormPreview) -> AppResult<Self> {
        let fields = value
            .fields
            .into_iter()
            .map(|preview| {
                Ok(PreviewFieldResponse {
                    field: to_json(&preview.field)?,
                    branching_number: preview.marker.map(|marker| marker.branching_number),
                    branching_color: preview
                        .marker
                        .map(|marker| marker.branching_color.to_owned()),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            fields,
            errors: value
                .report
                .errors()
                .iter()
                .map(|(name, code)| (name.clone(), code.as_str().to_owned()))
                .collect(),
            is_valid: value.report.is_valid(),
        })
    }
}

fn to_json(value: &impl Serialize) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to encode response: {error}")))
}
