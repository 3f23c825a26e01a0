use std::sync::Arc;

use csrd_application::UserRecord;
use csrd_core::NonEmptyString;
use csrd_domain::{EmailAddress, FormTemplate, User, UserId, UserProfile, UserRole, UserStatus};
use csrd_infrastructure::{
    InMemoryDeclarationRepository, InMemoryFormTemplateRepository, InMemoryOrgUnitRepository,
    InMemoryUserRepository,
};
use serde_json::json;

use crate::state::AppState;

pub(crate) const ADMIN_ID: &str = "admin-1";
pub(crate) const MEMBER_ID: &str = "member-1";
pub(crate) const OTHER_MEMBER_ID: &str = "member-2";
pub(crate) const TEMPLATE_ID: &str = "form-1";

pub(crate) fn user(id: &str, nni: &str, role: UserRole) -> User {
    let profile = UserProfile {
        nni: NonEmptyString::new(nni).unwrap_or_else(|_| unreachable!()),
        email: EmailAddress::new(format!("{nni}@example.com")).unwrap_or_else(|_| unreachable!()),
        last_name: NonEmptyString::new("Martin").unwrap_or_else(|_| unreachable!()),
        first_name: NonEmptyString::new("Jeanne").unwrap_or_else(|_| unreachable!()),
    };
    User::new(
        UserId::new(id).unwrap_or_else(|_| unreachable!()),
        profile,
        role,
        UserStatus::Active,
    )
}

/// Active template with a required radio revealing a required number.
pub(crate) fn waste_template() -> FormTemplate {
    serde_json::from_value(json!({
        "id": TEMPLATE_ID,
        "name": "Déchets",
        "categoryCode": "E5-5",
        "schema": {
            "fields": [
                {
                    "id": "f1",
                    "name": "has_waste",
                    "label": "Déchets produits ?",
                    "type": "radio",
                    "required": true,
                    "options": [
                        {"value": "yes", "label": "Oui"},
                        {"value": "no", "label": "Non"}
                    ]
                },
                {
                    "id": "f2",
                    "name": "volume",
                    "label": "Volume",
                    "type": "number",
                    "required": true
                }
            ],
            "branching": [{"fieldId": "f1", "optionValue": "yes", "children": ["f2"]}]
        }
    }))
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn app_state() -> AppState {
    let records = [
        (ADMIN_ID, "B00001", UserRole::Admin),
        (MEMBER_ID, "A12345", UserRole::Member),
        (OTHER_MEMBER_ID, "A67890", UserRole::Member),
    ]
    .into_iter()
    .map(|(id, nni, role)| UserRecord {
        user: user(id, nni, role),
        password: "secret".to_owned(),
    });

    AppState::from_repositories(
        Arc::new(InMemoryUserRepository::with_records(records)),
        Arc::new(InMemoryFormTemplateRepository::with_templates([
            waste_template(),
        ])),
        Arc::new(InMemoryDeclarationRepository::new()),
        Arc::new(InMemoryOrgUnitRepository::new()),
    )
}
