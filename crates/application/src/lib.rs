//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_service;
mod declaration_service;
mod form_builder;
mod form_template_service;
mod org_unit_service;
mod ports;
mod stores;

#[cfg(test)]
mod test_support;

pub use auth_service::{
    AuthService, RegisterParams, UNKNOWN_IDENTIFIER_MESSAGE, WRONG_PASSWORD_MESSAGE,
};
pub use declaration_service::{DeclarationOutcome, DeclarationQuery, DeclarationService};
pub use form_builder::{FormBuilder, FormPreview, PreviewField};
pub use form_template_service::FormTemplateService;
pub use org_unit_service::OrgUnitService;
pub use ports::{
    DeclarationRepository, FormTemplateRepository, OrgUnitRepository, UserRecord, UserRepository,
};
pub use stores::{
    AuthStore, CategoryStore, DeclarationStore, OrgUnitStore, ResourceState, TemplateStore,
};
