//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod identifier;

mod branching;
mod category;
mod declaration;
mod declaration_stats;
mod field_config;
mod field_type;
mod form_template;
mod org_unit;
mod registry;
mod schema;
mod user;
mod validation;
mod visibility;

pub use branching::{BRANCH_PALETTE, BranchLink, BranchMarker, BranchingGraph};
pub use category::{CategoryCode, DEFAULT_CATEGORY_CODE};
pub use declaration::{
    ACTION_CREATED, ACTION_MODIFIED, ACTION_SUBMITTED, ACTION_VALIDATED, Declaration,
    DeclarationId, DeclarationStatus, ModificationEntry,
};
pub use declaration_stats::DeclarationStats;
pub use field_config::{FieldConfig, FieldId, FieldKind, FieldOption};
pub use field_type::FieldType;
pub use form_template::{
    FormTemplate, FormTemplateInput, TemplateId, TemplateLineage, TemplateRevision, TemplateState,
};
pub use org_unit::{OrgUnit, OrgUnitId, OrgUnitLevel};
pub use registry::{FieldDefaults, FieldTypeHandler, FieldTypeRegistry};
pub use schema::FormSchema;
pub use user::{EmailAddress, LoginIdentifier, User, UserId, UserProfile, UserRole, UserStatus};
pub use validation::{
    Answers, FieldErrorCode, ValidationReport, answer_includes, is_empty_value,
};
pub use visibility::VisibleFields;
