use std::sync::Arc;

use csrd_core::NonEmptyString;
use csrd_domain::{
    CategoryCode, FieldErrorCode, FormSchema, FormTemplateInput, OrgUnitId, OrgUnitLevel,
    UserRole,
};
use serde_json::Map;

use super::{AuthStore, CategoryStore, DeclarationStore, OrgUnitStore, TemplateStore};
use crate::auth_service::{AuthService, WRONG_PASSWORD_MESSAGE};
use crate::declaration_service::DeclarationService;
use crate::form_template_service::FormTemplateService;
use crate::org_unit_service::OrgUnitService;
use crate::ports::UserRecord;
use crate::test_support::{
    FakeDeclarationRepository, FakeOrgUnitRepository, FakeTemplateRepository, FakeUserRepository,
    user,
};

fn input(name: &str, category: &str) -> FormTemplateInput {
    FormTemplateInput {
        name: NonEmptyString::new(name).unwrap_or_else(|_| unreachable!()),
        description: String::new(),
        category_code: CategoryCode::new(category).unwrap_or_else(|_| unreachable!()),
        schema: serde_json::from_value::<FormSchema>(serde_json::json!([
            {"id": "f1", "name": "volume", "type": "number", "required": true}
        ]))
        .unwrap_or_else(|_| unreachable!()),
    }
}

fn auth_store() -> AuthStore {
    AuthStore::new(AuthService::new(FakeUserRepository::with_records(vec![
        UserRecord {
            user: user("1", "A12345", "jeanne.martin@edf.fr", UserRole::Member),
            password: "secret".to_owned(),
        },
    ])))
}

#[tokio::test]
async fn failed_login_keeps_inline_message() {
    let mut store = auth_store();

    assert!(!store.login("A12345", "wrong").await);

    assert_eq!(store.state().error(), Some(WRONG_PASSWORD_MESSAGE));
    assert!(!store.state().loading());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn successful_login_clears_previous_error_and_logout_resets() {
    let mut store = auth_store();
    assert!(!store.login("A12345", "wrong").await);

    assert!(store.login("A12345", "secret").await);
    assert_eq!(store.state().error(), None);
    assert_eq!(
        store.current_user().map(|user| user.nni().as_str()),
        Some("A12345")
    );

    store.logout();
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn team_assignment_updates_the_session() {
    let mut store = auth_store();
    let team_id = OrgUnitId::new("t1").unwrap_or_else(|_| unreachable!());
    assert!(!store.assign_team(&team_id).await);

    assert!(store.login("jeanne.martin@edf.fr", "secret").await);
    assert!(store.assign_team(&team_id).await);

    assert_eq!(store.current_user().and_then(|user| user.team()), Some(&team_id));
}

#[tokio::test]
async fn categories_are_loaded_once() {
    let repository = Arc::new(FakeTemplateRepository::default());
    let service = FormTemplateService::new(repository.clone());
    assert!(service.create(input("Eau", "E3-1")).await.is_ok());
    let mut store = CategoryStore::new(service);

    let first: Vec<String> = store
        .ensure_loaded()
        .await
        .iter()
        .map(|code| code.as_str().to_owned())
        .collect();
    let second_len = store.ensure_loaded().await.len();

    assert_eq!(first, vec!["E2-4", "E3-1"]);
    assert_eq!(second_len, 2);
    assert_eq!(repository.list_calls(), 1);

    store.reset();
    assert!(store.state().data().is_empty());
    store.ensure_loaded().await;
    assert_eq!(repository.list_calls(), 2);
}

#[tokio::test]
async fn template_store_tracks_saved_and_published_templates() {
    let mut store = TemplateStore::new(FormTemplateService::new(Arc::new(
        FakeTemplateRepository::default(),
    )));

    let created_id = store
        .save(None, input("Eau", "E3-1"))
        .await
        .map(|template| template.id().clone())
        .unwrap_or_else(|| unreachable!());
    assert!(store.publish(&created_id).await);
    assert!(store.current().is_some_and(|template| template.is_published()));

    assert!(!store.publish(&created_id).await);
    assert!(store.state().error().is_some());

    let derived_version = store
        .save(Some(&created_id), input("Eau v2", "E3-1"))
        .await
        .map(|template| template.version());
    assert_eq!(derived_version, Some(2));
    assert_eq!(store.state().data().len(), 2);

    assert!(store.delete(&created_id).await);
    assert_eq!(store.state().data().len(), 1);
}

#[tokio::test]
async fn declaration_store_keeps_rejections_and_stats() {
    let templates = Arc::new(FakeTemplateRepository::default());
    let template_service = FormTemplateService::new(templates.clone());
    let template = template_service
        .create(input("Eau", "E3-1"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let mut store = DeclarationStore::new(DeclarationService::new(
        Arc::new(FakeDeclarationRepository::default()),
        templates,
    ));
    let author = user("1", "A12345", "jeanne.martin@edf.fr", UserRole::Member);

    let draft = store
        .create(&author, template.id(), Map::new())
        .await
        .unwrap_or_else(|| unreachable!());
    assert!(store.submit(&author, draft.id()).await.is_none());

    assert_eq!(
        store
            .rejection()
            .and_then(|report| report.error_for("volume")),
        Some(FieldErrorCode::Required)
    );
    assert_eq!(store.state().error(), None);
    assert_eq!(store.stats().to_review, 0);
    assert_eq!(store.state().data().len(), 1);

    store.reset();
    assert!(store.rejection().is_none());
    assert!(store.state().data().is_empty());
}

#[tokio::test]
async fn loading_a_level_clears_deeper_levels() {
    let mut store = OrgUnitStore::new(OrgUnitService::new(FakeOrgUnitRepository::with_units(
        vec![
            (OrgUnitLevel::Directions, None, "d1", "Direction Nord"),
            (OrgUnitLevel::MaintenanceCenters, Some("d1"), "m1", "CM Lille"),
            (OrgUnitLevel::Gmrs, Some("m1"), "g1", "GMR Artois"),
        ],
    )));
    let direction = OrgUnitId::new("d1").unwrap_or_else(|_| unreachable!());
    let center = OrgUnitId::new("m1").unwrap_or_else(|_| unreachable!());

    store.load(OrgUnitLevel::Directions, None).await;
    store
        .load(OrgUnitLevel::MaintenanceCenters, Some(&direction))
        .await;
    store.load(OrgUnitLevel::Gmrs, Some(&center)).await;
    assert_eq!(store.units(OrgUnitLevel::Gmrs).len(), 1);

    store
        .load(OrgUnitLevel::MaintenanceCenters, Some(&direction))
        .await;
    assert!(store.units(OrgUnitLevel::Gmrs).is_empty());
    assert_eq!(store.units(OrgUnitLevel::Directions).len(), 1);

    store.load(OrgUnitLevel::Teams, None).await;
    assert!(store.state().error().is_some());
}
