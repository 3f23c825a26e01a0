use std::sync::Arc;

use csrd_application::{
    AuthService, DeclarationRepository, DeclarationService, FormTemplateRepository,
    FormTemplateService, OrgUnitRepository, OrgUnitService, UserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub form_template_service: FormTemplateService,
    pub declaration_service: DeclarationService,
    pub org_unit_service: OrgUnitService,
}

impl AppState {
    /// Wires services over one repository per resource.
    pub fn from_repositories(
        users: Arc<dyn UserRepository>,
        templates: Arc<dyn FormTemplateRepository>,
        declarations: Arc<dyn DeclarationRepository>,
        org_units: Arc<dyn OrgUnitRepository>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users),
            form_template_service: FormTemplateService::new(templates.clone()),
            declaration_service: DeclarationService::new(declarations, templates),
            org_unit_service: OrgUnitService::new(org_units),
        }
    }
}
