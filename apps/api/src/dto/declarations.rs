use std::collections::BTreeMap;

use csrd_domain::{Answers, Declaration, DeclarationStats, ModificationEntry, ValidationReport};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for starting a declaration.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-declaration-request.ts"
)]
pub struct CreateDeclarationRequest {
    pub form_template_id: String,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub form_data: Answers,
}

/// Incoming payload replacing the answers of a declaration.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-declaration-request.ts"
)]
pub struct UpdateDeclarationRequest {
    #[ts(type = "Record<string, unknown>")]
    pub form_data: Answers,
}

/// API representation of one history entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/modification-entry-response.ts"
)]
pub struct ModificationEntryResponse {
    pub id: String,
    pub user_name: String,
    pub timestamp: String,
    pub action: String,
    pub details: Option<String>,
}

impl From<&ModificationEntry> for ModificationEntryResponse {
    fn from(value: &ModificationEntry) -> Self {
        Self {
            id: value.id().to_owned(),
            user_name: value.user_name().to_owned(),
            timestamp: value.timestamp().to_rfc3339(),
            action: value.action().to_owned(),
            details: value.details().map(ToOwned::to_owned),
        }
    }
}

/// API representation of a declaration.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/declaration-response.ts"
)]
pub struct DeclarationResponse {
    pub id: String,
    pub form_template_id: String,
    pub author_id: String,
    pub team_id: Option<String>,
    #[ts(type = "Record<string, unknown>")]
    pub form_data: Answers,
    pub status: String,
    pub history: Vec<ModificationEntryResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Declaration> for DeclarationResponse {
    fn from(value: Declaration) -> Self {
        Self {
            id: value.id().to_string(),
            form_template_id: value.form_template_id().to_string(),
            author_id: value.author_id().to_string(),
            team_id: value.team_id().map(ToString::to_string),
            form_data: value.form_data().clone(),
            status: value.status().as_str().to_owned(),
            history: value
                .history()
                .iter()
                .map(ModificationEntryResponse::from)
                .collect(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/declaration-stats-response.ts"
)]
pub struct DeclarationStatsResponse {
    #[serde(rename = "declarationsAFaire")]
    pub to_review: usize,
    #[serde(rename = "declarationsEffectuees")]
    pub validated: usize,
    #[serde(rename = "declarationsModifiees")]
    pub modified: usize,
}

impl From<DeclarationStats> for DeclarationStatsResponse {
    fn from(value: DeclarationStats) -> Self {
        Self {
            to_review: value.to_review,
            validated: value.validated,
            modified: value.modified,
        }
    }
}

/// Field errors returned when answers are rejected.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/validation-errors-response.ts"
)]
pub struct ValidationErrorsResponse {
    pub message: String,
    pub errors: BTreeMap<String, String>,
}

impl From<ValidationReport> for ValidationErrorsResponse {
    fn from(value: ValidationReport) -> Self {
        Self {
            message: "Certains champs sont invalides".to_owned(),
            errors: value
                .errors()
                .iter()
                .map(|(name, code)| (name.clone(), code.as_str().to_owned()))
                .collect(),
        }
    }
}
