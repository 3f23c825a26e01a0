mod auth;
mod common;
mod declarations;
mod forms;
mod org_units;

pub use auth::{AssignTeamRequest, LoginRequest, RegisterRequest, UserResponse};
pub use common::HealthResponse;
pub use declarations::{
    CreateDeclarationRequest, DeclarationResponse, DeclarationStatsResponse,
    ModificationEntryResponse, UpdateDeclarationRequest, ValidationErrorsResponse,
};
pub use forms::{
    FormTemplateRequest, FormTemplateResponse, PreviewFieldResponse, PreviewRequest,
    PreviewResponse, SetActiveRequest,
};
pub use org_units::OrgUnitResponse;

#[cfg(test)]
mod tests {
    use ts_rs::{Config, TS};

    use super::{
        AssignTeamRequest, CreateDeclarationRequest, DeclarationResponse,
        DeclarationStatsResponse, FormTemplateRequest, FormTemplateResponse, HealthResponse,
        LoginRequest, ModificationEntryResponse, OrgUnitResponse, PreviewFieldResponse,
        PreviewRequest, PreviewResponse, RegisterRequest, SetActiveRequest,
        UpdateDeclarationRequest, UserResponse, ValidationErrorsResponse,
    };
    use crate::error::ErrorResponse;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        LoginRequest::export(&config)?;
        RegisterRequest::export(&config)?;
        AssignTeamRequest::export(&config)?;
        UserResponse::export(&config)?;
        FormTemplateRequest::export(&config)?;
        FormTemplateResponse::export(&config)?;
        SetActiveRequest::export(&config)?;
        PreviewRequest::export(&config)?;
        PreviewFieldResponse::export(&config)?;
        PreviewResponse::export(&config)?;
        CreateDeclarationRequest::export(&config)?;
        UpdateDeclarationRequest::export(&config)?;
        DeclarationResponse::export(&config)?;
        ModificationEntryResponse::export(&config)?;
        DeclarationStatsResponse::export(&config)?;
        ValidationErrorsResponse::export(&config)?;
        OrgUnitResponse::export(&config)?;

        Ok(())
    }
}
