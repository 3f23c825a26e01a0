//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_declaration_repository;
mod in_memory_form_template_repository;
mod in_memory_org_unit_repository;
mod in_memory_user_repository;
mod json_fixture_loader;
mod json_server_client;
mod rest_declaration_repository;
mod rest_form_template_repository;
mod rest_org_unit_repository;
mod rest_user_repository;
mod stored_user;

pub use in_memory_declaration_repository::InMemoryDeclarationRepository;
pub use in_memory_form_template_repository::InMemoryFormTemplateRepository;
pub use in_memory_org_unit_repository::InMemoryOrgUnitRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use json_fixture_loader::{FixtureOrgUnit, JsonFixtureLoader};
pub use json_server_client::JsonServerClient;
pub use rest_declaration_repository::RestDeclarationRepository;
pub use rest_form_template_repository::RestFormTemplateRepository;
pub use rest_org_unit_repository::RestOrgUnitRepository;
pub use rest_user_repository::RestUserRepository;
